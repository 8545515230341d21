//! tome TUI — ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use tome_catalog::OpenLibrary;
use tome_core::config::Config;

/// Start the TUI against the production catalog.
///
/// A multi-thread tokio runtime is stood up for the debounce timer and the
/// lookup tasks; the UI itself stays on the calling thread.
pub fn run() -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_else(|_| Config::defaults());
    let theme = theme::Theme::load_default();

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    App::new(OpenLibrary::new(), config, theme).run()
}
