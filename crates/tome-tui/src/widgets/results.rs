//! Results panel — renders the current search outcome below the search bar.
//!
//! One pane, five faces:
//! - Idle: a dim hint that nothing is being searched.
//! - Loading: a whimsical status line, chosen deterministically per query.
//! - Failed: `Error: <message>`.
//! - Succeeded with no items: "No results found."
//! - Succeeded: one row per book — cover glyph, title, publish year, and an
//!   author line underneath. `j`/`k` move the selection; the App shell opens
//!   the selected book on `Enter`.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use tome_core::search::SearchState;
use tome_core::Book;

/// Status lines shown while a lookup is in flight. The pick is a stable hash
/// of the query, so a query keeps its message for as long as it loads but
/// different queries still get variety.
const LOADING_MESSAGES: &[&str] = &[
    "Rummaging through the shelves...",
    "Interrogating the librarians...",
    "Dusting off ancient tomes...",
    "Bribing the bookworms for intel...",
    "Summoning books from the void...",
    "Hunting the elusive first editions...",
    "Decoding the Dewey Decimal mystery...",
    "Persuading shy novels to appear...",
];

/// Deterministic loading message for a query.
pub fn loading_message(query: &str) -> &'static str {
    let hash = query.bytes().fold(5381usize, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(b as usize)
    });
    LOADING_MESSAGES[hash % LOADING_MESSAGES.len()]
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ResultsState {
    /// Index of the highlighted row within the current result set.
    pub selected: usize,
    /// When the shown result set arrived, for the pane title.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Whether cover glyphs are rendered (`:covers` toggles).
    pub show_covers: bool,
    /// Whether the first-publish year is appended to titles.
    pub show_publish_year: bool,
}

impl ResultsState {
    pub fn new(ui: &tome_core::config::UiConfig) -> Self {
        Self {
            selected: 0,
            fetched_at: None,
            show_covers: ui.show_covers,
            show_publish_year: ui.show_publish_year,
        }
    }

    /// Handle a navigation event. `count` is the size of the current result
    /// set; the selection is clamped to it.
    pub fn handle(&mut self, event: &AppEvent, count: usize) {
        if count == 0 {
            self.selected = 0;
            return;
        }
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.selected = self.selected.saturating_sub(1);
                tracing::debug!(selected = self.selected, "results: selection up");
            }
            AppEvent::Nav(Direction::Down) => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
                tracing::debug!(selected = self.selected, "results: selection down");
            }
            _ => {}
        }
    }

    /// A lookup settled; reset the selection and stamp the arrival time for
    /// successful outcomes.
    pub fn on_outcome(&mut self, succeeded: bool, at: DateTime<Utc>) {
        self.selected = 0;
        self.fetched_at = if succeeded { Some(at) } else { None };
    }

    /// The search was cleared.
    pub fn on_cleared(&mut self) {
        self.selected = 0;
        self.fetched_at = None;
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct Results<'a> {
    search: &'a SearchState,
    state: &'a ResultsState,
    /// The committed query the current state belongs to.
    query: &'a str,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> Results<'a> {
    pub fn new(
        search: &'a SearchState,
        state: &'a ResultsState,
        query: &'a str,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { search, state, query, focused, theme }
    }

    fn title(&self) -> String {
        match (self.search, self.state.fetched_at) {
            (SearchState::Succeeded(books), Some(at)) => {
                format!(" Results ({}) · {} ", books.len(), at.format("%H:%M:%S"))
            }
            _ => " Results ".to_string(),
        }
    }
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered()
            .title(self.title())
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line<'static>> = match self.search {
            SearchState::Idle => vec![Line::from(Span::styled(
                "Type to search the catalog.",
                self.theme.hint,
            ))],
            SearchState::Loading => vec![Line::from(Span::styled(
                loading_message(self.query),
                self.theme.status_message,
            ))],
            SearchState::Failed(err) => vec![Line::from(Span::styled(
                format!("Error: {}", err.message()),
                self.theme.status_error,
            ))],
            SearchState::Succeeded(books) if books.is_empty() => vec![Line::from(Span::styled(
                "No results found.",
                self.theme.status_message,
            ))],
            SearchState::Succeeded(books) => books
                .iter()
                .enumerate()
                .flat_map(|(row, book)| {
                    let selected = self.focused && row == self.state.selected;
                    self.render_book(book, selected)
                })
                .collect(),
        };

        Paragraph::new(lines).render(inner, buf);
    }
}

impl Results<'_> {
    fn render_book(&self, book: &Book, selected: bool) -> Vec<Line<'static>> {
        let mut title_spans: Vec<Span<'static>> = Vec::new();

        if self.state.show_covers {
            let glyph = if book.has_cover() {
                Span::styled("▐█ ".to_string(), self.theme.cover_style(&book.key))
            } else {
                Span::styled("▫▫ ".to_string(), self.theme.hint)
            };
            title_spans.push(glyph);
        }

        title_spans.push(Span::styled(book.title.clone(), self.theme.result_title));

        if self.state.show_publish_year {
            if let Some(year) = book.first_publish_year {
                title_spans.push(Span::styled(format!("  ({year})"), self.theme.result_year));
            }
        }

        let indent = if self.state.show_covers { "   " } else { "" };
        let mut title_line = Line::from(title_spans);
        let mut author_line = Line::from(Span::styled(
            format!("{indent}{}", book.author_line()),
            self.theme.result_author,
        ));

        if selected {
            title_line = title_line.patch_style(self.theme.selection);
            author_line = author_line.patch_style(self.theme.selection);
        }

        vec![title_line, author_line]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
