//! Search bar widget — the debounced text input at the top of the screen.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor (arrow keys while this pane
//!   is focused, re-mapped by the App shell).
//!
//! The widget only echoes; it never talks to the search layer. The App shell
//! feeds every buffer change into the debounce controller, which decides
//! when a query is actually committed.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchBarState {
    /// The raw text typed by the user (untrimmed).
    pub text: String,
    /// Byte offset of the cursor within `text`.
    pub cursor: usize,
}

impl SearchBarState {
    /// Handle a key event from the app shell.
    ///
    /// Returns `true` when the buffer changed, so the caller knows to reset
    /// the debounce timer. Cursor-only movement returns `false`.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Char(c) => {
                self.text.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(text = %self.text, cursor = self.cursor, "search bar: char inserted");
                true
            }
            AppEvent::Backspace => {
                if self.cursor > 0 {
                    // Walk back one char boundary
                    let prev = self.text[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.text.remove(prev);
                    self.cursor = prev;
                    tracing::debug!(text = %self.text, cursor = self.cursor, "search bar: backspace");
                    true
                } else {
                    false
                }
            }
            // Left/right arrows re-mapped from Nav by the App shell
            AppEvent::Nav(Direction::Left) => {
                if self.cursor > 0 {
                    self.cursor = self.text[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                }
                false
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor < self.text.len() {
                    let next = self.text[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.text.len());
                    self.cursor = next;
                }
                false
            }
            _ => false,
        }
    }

    /// Empty the buffer and put the cursor at the start.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SearchBar<'a> {
    state: &'a SearchBarState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(state: &'a SearchBarState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        // The block adds 1-cell borders; text starts at (area.x+1, area.y+1).
        let col = self.state.text[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        let y = area.y + 1;
        (x, y)
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered().title("Search").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.state.text.is_empty() && !self.focused {
            Line::from(Span::styled("Quick search... (press /)", self.theme.hint))
        } else if self.state.text.is_empty() {
            Line::from(Span::styled("Quick search...", self.theme.hint))
        } else {
            Line::from(Span::styled(self.state.text.as_str(), Style::default()))
        };
        Paragraph::new(line).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_insert_and_backspace() {
        let mut s = SearchBarState::default();
        assert!(s.handle(&AppEvent::Char('d')));
        assert!(s.handle(&AppEvent::Char('u')));
        assert!(s.handle(&AppEvent::Char('n')));
        assert_eq!(s.text, "dun");
        assert_eq!(s.cursor, 3);
        assert!(s.handle(&AppEvent::Backspace));
        assert_eq!(s.text, "du");
        assert_eq!(s.cursor, 2);
    }

    #[test]
    fn backspace_on_empty_buffer_reports_no_change() {
        let mut s = SearchBarState::default();
        assert!(!s.handle(&AppEvent::Backspace));
    }

    #[test]
    fn cursor_movement_does_not_report_change() {
        let mut s = SearchBarState::default();
        s.handle(&AppEvent::Char('a'));
        s.handle(&AppEvent::Char('b'));
        assert!(!s.handle(&AppEvent::Nav(Direction::Left)));
        assert_eq!(s.cursor, 1);
        assert!(!s.handle(&AppEvent::Nav(Direction::Right)));
        assert_eq!(s.cursor, 2);
    }

    #[test]
    fn insert_at_cursor_respects_char_boundaries() {
        let mut s = SearchBarState::default();
        s.handle(&AppEvent::Char('é'));
        s.handle(&AppEvent::Char('x'));
        s.handle(&AppEvent::Nav(Direction::Left));
        s.handle(&AppEvent::Char('y'));
        assert_eq!(s.text, "éyx");
    }

    #[test]
    fn clear_resets_buffer_and_cursor() {
        let mut s = SearchBarState::default();
        s.handle(&AppEvent::Char('a'));
        s.clear();
        assert_eq!(s.text, "");
        assert_eq!(s.cursor, 0);
    }
}
