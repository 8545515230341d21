//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Each loop turn first
//! drains the async notifications — debounce expiries and settled lookups —
//! so every state transition happens on this thread, within one turn.

use crate::{
    commands::Command,
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        results::{Results, ResultsState},
        search_bar::{SearchBar, SearchBarState},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tome_catalog::Catalog;
use tome_core::{
    config::Config,
    debounce::{Emission, Fired, QueryDebouncer},
    search::{SearchError, SearchManager, SearchTicket},
    Book,
};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SearchBar,
    Results,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub search_bar: SearchBarState,
    pub results: ResultsState,
    pub command_bar: CommandBarState,
    pub manager: SearchManager,
    /// The committed query the current search state belongs to.
    pub active_query: String,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub quit: bool,
}

/// A settled lookup, delivered from its background task.
struct SearchDone {
    seq: u64,
    outcome: Result<Vec<Book>, SearchError>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<C: Catalog> {
    state: AppState,
    catalog: Arc<C>,
    debouncer: QueryDebouncer,
    fired_rx: mpsc::UnboundedReceiver<Fired>,
    done_tx: mpsc::UnboundedSender<SearchDone>,
    done_rx: mpsc::UnboundedReceiver<SearchDone>,
}

impl<C: Catalog> App<C> {
    pub fn new(catalog: C, config: Config, theme: Theme) -> Self {
        let (debouncer, fired_rx) = QueryDebouncer::new();
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        let state = AppState {
            focus: Focus::SearchBar,
            prev_focus: Focus::SearchBar,
            search_bar: SearchBarState::default(),
            results: ResultsState::new(&config.ui),
            command_bar: CommandBarState::default(),
            manager: SearchManager::new(),
            active_query: String::new(),
            theme,
            config,
            show_help: false,
            quit: false,
        };

        App {
            state,
            catalog: Arc::new(catalog),
            debouncer,
            fired_rx,
            done_tx,
            done_rx,
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on
    /// exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.drain_notifications();

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(
                                focus = ?self.state.focus,
                                event = ?ev,
                                "key event"
                            );
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Drain debounce expiries and settled lookups delivered since the last
    /// turn.
    fn drain_notifications(&mut self) {
        while let Ok(fired) = self.fired_rx.try_recv() {
            if let Some(emission) = self.debouncer.resolve(fired) {
                self.apply_emission(emission);
            }
        }

        while let Ok(done) = self.done_rx.try_recv() {
            let succeeded = done.outcome.is_ok();
            if self.state.manager.finish(done.seq, done.outcome) {
                self.state.results.on_outcome(succeeded, chrono::Utc::now());
            }
        }
    }

    /// Act on a committed debounce emission.
    fn apply_emission(&mut self, emission: Emission) {
        match emission {
            Emission::Query(query) => {
                self.state.active_query = query.clone();
                if let Some(ticket) = self.state.manager.begin(&query) {
                    spawn_search(self.catalog.clone(), ticket, self.done_tx.clone());
                }
            }
            Emission::Clear => {
                self.state.active_query.clear();
                self.state.manager.clear();
                self.state.results.on_cleared();
            }
        }
    }

    /// Reset the whole search surface: input, committed query, and results.
    fn clear_search(&mut self) {
        tracing::debug!("search cleared");
        self.state.search_bar.clear();
        self.debouncer.reset();
        self.state.manager.clear();
        self.state.results.on_cleared();
        self.state.active_query.clear();
    }

    fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.state.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    self.state.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Command mode intercepts all events.
        if self.state.focus == Focus::Command {
            match event {
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    self.state.command_bar.clear();
                    self.state.focus = self.state.prev_focus;
                }
                AppEvent::Enter => {
                    let input = self.state.command_bar.input.clone();
                    match Command::parse(&input) {
                        Ok(cmd) => {
                            tracing::debug!(command = ?cmd, "executing command");
                            self.state.command_bar.clear();
                            self.state.focus = self.state.prev_focus;
                            self.execute(cmd);
                        }
                        Err(msg) if msg.is_empty() => {
                            // Empty input — just close
                            self.state.command_bar.clear();
                            self.state.focus = self.state.prev_focus;
                        }
                        Err(msg) => {
                            // Show the error; bar stays open
                            self.state.command_bar.error = Some(msg);
                        }
                    }
                }
                other => self.state.command_bar.handle(&other),
            }
            return;
        }

        match event {
            // Toggle help (only when not typing in the search bar)
            AppEvent::Char('?') if self.state.focus != Focus::SearchBar => {
                tracing::debug!("help popup opened");
                self.state.show_help = true;
            }

            // Enter command mode with `:` (not from the search bar)
            AppEvent::Char(':') if self.state.focus != Focus::SearchBar => {
                tracing::debug!(prev_focus = ?self.state.focus, "entering command mode");
                self.state.prev_focus = self.state.focus;
                self.state.command_bar.clear();
                self.state.focus = Focus::Command;
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                self.state.quit = true;
            }

            // Return focus from the search bar
            AppEvent::Escape => {
                if self.state.focus == Focus::SearchBar {
                    tracing::debug!("focus: SearchBar -> Results");
                    self.state.focus = Focus::Results;
                }
            }

            // Tab-cycle focus: SearchBar ↔ Results
            AppEvent::FocusNext => {
                let next = match self.state.focus {
                    Focus::SearchBar => Focus::Results,
                    Focus::Results | Focus::Command => Focus::SearchBar,
                };
                tracing::debug!(from = ?self.state.focus, to = ?next, "focus cycle");
                self.state.focus = next;
            }

            // Jump to the search bar
            AppEvent::SearchFocus => {
                tracing::debug!("focus -> SearchBar");
                self.state.focus = Focus::SearchBar;
            }

            AppEvent::ClearSearch => self.clear_search(),

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other => self.dispatch_to_focused(other),
        }
    }

    /// Route an event to the widget that owns the current focus.
    fn dispatch_to_focused(&mut self, event: AppEvent) {
        match self.state.focus {
            Focus::SearchBar => {
                if event == AppEvent::Enter {
                    // Results are already live via the debounce; Enter just
                    // moves over to them.
                    self.state.focus = Focus::Results;
                    return;
                }
                if self.state.search_bar.handle(&event) {
                    self.debouncer.on_input(&self.state.search_bar.text);
                }
            }
            Focus::Results => {
                if event == AppEvent::Enter {
                    self.open_selected();
                    return;
                }
                let count = self.state.manager.state().books().len();
                self.state.results.handle(&event, count);
            }
            Focus::Command => {} // handled before dispatch, should not reach here
        }
    }

    /// Open the selected result's bookstore page in the system browser.
    fn open_selected(&self) {
        let books = self.state.manager.state().books();
        let Some(book) = books.get(self.state.results.selected) else {
            return;
        };
        let url = tome_catalog::purchase_url(book);
        tracing::debug!(title = %book.title, url = %url, "opening result");
        if let Err(err) = open::that_detached(&url) {
            tracing::warn!(error = %err, "failed to open browser");
        }
    }

    /// Execute a parsed [`Command`].
    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => {
                self.state.quit = true;
            }
            Command::Help => {
                self.state.show_help = !self.state.show_help;
            }
            Command::Theme(name) => {
                self.state.theme = match name.to_ascii_lowercase().as_str() {
                    "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Theme::load_gruvbox_dark(),
                    _ => Theme::load_default(),
                };
            }
            Command::Covers => {
                self.state.results.show_covers = !self.state.results.show_covers;
            }
            Command::Clear => self.clear_search(),
        }
    }
}

/// Dispatch one catalog lookup for `ticket` on a background task.
///
/// The lookup itself runs on an inner task so that a panic inside the
/// backend surfaces as a `JoinError` here instead of taking the dispatcher
/// down; it is folded into the fixed unknown-error failure.
fn spawn_search<C: Catalog>(
    catalog: Arc<C>,
    ticket: SearchTicket,
    tx: mpsc::UnboundedSender<SearchDone>,
) {
    let SearchTicket { seq, query } = ticket;
    tokio::spawn(async move {
        let lookup =
            tokio::spawn(async move { tome_catalog::lookup(catalog.as_ref(), &query).await });
        let outcome = match lookup.await {
            Ok(result) => result,
            Err(join_err) => {
                tracing::warn!(seq, error = %join_err, "lookup task died");
                Err(SearchError::unknown())
            }
        };
        // Receiver gone means the app is shutting down; nothing to do.
        let _ = tx.send(SearchDone { seq, outcome });
    });
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::SearchBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 3-line search bar | results | 1-line hint / command row
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(
        SearchBar::new(&state.search_bar, state.focus == Focus::SearchBar, &state.theme),
        vert[0],
    );
    frame.render_widget(
        Results::new(
            state.manager.state(),
            &state.results,
            &state.active_query,
            state.focus == Focus::Results,
            &state.theme,
        ),
        vert[1],
    );

    if state.focus == Focus::Command {
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), vert[2]);
        let col = state.command_bar.cursor_col(vert[2]);
        frame.set_cursor_position((col, vert[2].y));
    } else {
        render_hints(vert[2], frame);
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Position the terminal cursor when the search bar is focused
    if state.focus == Focus::SearchBar {
        let sb = SearchBar::new(&state.search_bar, true, &state.theme);
        let (cx, cy) = sb.cursor_position(vert[0]);
        frame.set_cursor_position((cx, cy));
    }
}

fn render_hints(area: Rect, frame: &mut Frame) {
    let hints = " /:search  Tab:focus  j/k:select  Enter:open  C:clear  ?:help  q:quit ";
    frame.render_widget(
        Paragraph::new(Line::from(hints)).style(Style::default().add_modifier(Modifier::DIM)),
        area,
    );
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}
