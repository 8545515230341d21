//! Search layer — tracks the latest catalog lookup and its outcome.
//!
//! [`SearchManager`] owns the {Idle, Loading, Succeeded, Failed} state
//! machine. It performs no I/O itself: [`SearchManager::begin`] hands the
//! caller a sequence-tagged [`SearchTicket`] to dispatch exactly one lookup
//! for, and [`SearchManager::finish`] folds the outcome back in. Outcomes
//! from superseded tickets are discarded, so the state always reflects the
//! latest *issued* search, not whichever lookup happened to resolve last.
//!
//! All transitions are synchronous and infallible; lookup failures arrive as
//! values and surface only through [`SearchState::Failed`].

use crate::types::Book;

/// Fixed message for failures that carry no usable error of their own
/// (a panicked lookup task).
const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// A lookup failure, normalized to a single human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SearchError {
    message: String,
}

impl SearchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The fixed failure used when a lookup dies without a proper error.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ERROR)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of the latest search invocation.
///
/// Exactly one state holds at any time. `Idle` is both the initial state and
/// the state after a clear.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Loading,
    Succeeded(Vec<Book>),
    Failed(SearchError),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    /// The result items, empty unless the state is `Succeeded`.
    pub fn books(&self) -> &[Book] {
        match self {
            SearchState::Succeeded(books) => books,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&SearchError> {
        match self {
            SearchState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Permission to dispatch one lookup, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Monotonically increasing invocation tag; only the latest may settle
    /// the state.
    pub seq: u64,
    /// The trimmed, non-empty query to look up.
    pub query: String,
}

/// The search state machine.
#[derive(Debug, Default)]
pub struct SearchManager {
    state: SearchState,
    /// Sequence number of the latest issued ticket (0 = none yet).
    latest: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::Idle
    }
}

impl SearchManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Start a search for `query`.
    ///
    /// The input is trimmed; empty-after-trim is a no-op returning `None`
    /// with no state change. Otherwise the state enters `Loading` (dropping
    /// any prior error or results) and the returned ticket supersedes every
    /// earlier one.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.latest += 1;
        self.state = SearchState::Loading;
        tracing::debug!(seq = self.latest, query = %trimmed, "search: loading");
        Some(SearchTicket {
            seq: self.latest,
            query: trimmed.to_string(),
        })
    }

    /// Fold a completed lookup back into the state.
    ///
    /// Returns `false` when the ticket was superseded by a newer `begin` or
    /// `clear`, in which case the state is untouched. The latest ticket
    /// always leaves `Loading`, transitioning to `Succeeded` or `Failed`.
    pub fn finish(&mut self, seq: u64, outcome: Result<Vec<Book>, SearchError>) -> bool {
        if seq != self.latest {
            tracing::debug!(seq, latest = self.latest, "search: superseded outcome discarded");
            return false;
        }

        self.state = match outcome {
            Ok(books) => {
                tracing::debug!(seq, count = books.len(), "search: succeeded");
                SearchState::Succeeded(books)
            }
            Err(err) => {
                tracing::debug!(seq, error = %err, "search: failed");
                SearchState::Failed(err)
            }
        };
        true
    }

    /// Reset to `Idle` with no items. Outstanding tickets are superseded so
    /// an in-flight lookup cannot resurrect results after the clear.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.state = SearchState::Idle;
        tracing::debug!("search: cleared");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
