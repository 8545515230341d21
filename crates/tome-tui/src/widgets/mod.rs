//! Ratatui widgets for the tome TUI.

pub mod command_bar;
pub mod help;
pub mod results;
pub mod search_bar;
