//! Debounce controller — buffers raw input and emits a committed query after
//! a quiet period.
//!
//! The controller is split in two:
//! - [`DebounceState`] holds the last committed query and decides, as a pure
//!   transition, what a buffered text commits to: a new [`Emission::Query`],
//!   an [`Emission::Clear`], or nothing.
//! - [`QueryDebouncer`] owns the timing: each input change cancels the
//!   pending scheduled task and starts a new one that delivers a [`Fired`]
//!   notification over an mpsc channel once [`DEBOUNCE_INTERVAL`] elapses
//!   with no further input.
//!
//! Fired notifications are generation-tagged. A notification scheduled before
//! a newer keystroke carries a stale generation and is discarded by
//! [`QueryDebouncer::resolve`], so an emission with stale text is never
//! delivered even if the timer message was already in flight.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet period with no new input before the buffered text is committed.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

/// What a committed buffer asks the search layer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// Run a search for this trimmed, non-empty query.
    Query(String),
    /// The query was cleared; drop any shown results.
    Clear,
}

/// A quiet-period expiry, delivered over the debouncer's channel.
///
/// Opaque to callers; hand it back to [`QueryDebouncer::resolve`].
#[derive(Debug)]
pub struct Fired {
    generation: u64,
    text: String,
}

// ---------------------------------------------------------------------------
// Pure commit state
// ---------------------------------------------------------------------------

/// The debounce controller's durable state: the last committed query.
///
/// Transitions are pure so they can be tested without a runtime or a clock.
#[derive(Debug, Default)]
pub struct DebounceState {
    last_committed: String,
}

impl DebounceState {
    /// The most recently emitted non-empty query, or `""` when none is
    /// active.
    pub fn last_committed(&self) -> &str {
        &self.last_committed
    }

    /// Commit a buffered text: trim it, suppress duplicates, and decide the
    /// emission.
    ///
    /// - non-empty and different from the last committed query → commit and
    ///   emit [`Emission::Query`]
    /// - empty (or whitespace-only) while a query was active → reset and
    ///   emit [`Emission::Clear`]
    /// - anything else → `None`
    pub fn commit(&mut self, raw: &str) -> Option<Emission> {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if trimmed != self.last_committed {
                self.last_committed = trimmed.to_string();
                return Some(Emission::Query(trimmed.to_string()));
            }
            None
        } else if !self.last_committed.is_empty() {
            self.last_committed.clear();
            Some(Emission::Clear)
        } else {
            None
        }
    }

    /// Forget the committed query without emitting anything.
    pub fn reset(&mut self) {
        self.last_committed.clear();
    }
}

// ---------------------------------------------------------------------------
// Scheduled-task debouncer
// ---------------------------------------------------------------------------

/// Debounces raw text changes into [`Emission`]s.
///
/// Must be driven from within a tokio runtime: [`QueryDebouncer::on_input`]
/// spawns the sleep task, and the paired receiver yields [`Fired`] values to
/// pass back into [`QueryDebouncer::resolve`] on the owner's event loop.
#[derive(Debug)]
pub struct QueryDebouncer {
    state: DebounceState,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Fired>,
}

impl QueryDebouncer {
    /// Create a debouncer and the receiver its expiries arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Fired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                state: DebounceState::default(),
                generation: 0,
                pending: None,
                tx,
            },
            rx,
        )
    }

    /// Register a raw input change.
    ///
    /// Cancels any pending expiry and schedules a new one carrying the
    /// current buffer, due after [`DEBOUNCE_INTERVAL`].
    pub fn on_input(&mut self, text: &str) {
        self.abort_pending();
        self.generation += 1;

        let generation = self.generation;
        let text = text.to_string();
        let tx = self.tx.clone();
        tracing::debug!(generation, text = %text, "debounce: scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE_INTERVAL).await;
            // Receiver gone means the app is shutting down; nothing to do.
            let _ = tx.send(Fired { generation, text });
        }));
    }

    /// Resolve an expiry into an emission.
    ///
    /// Expiries from a superseded generation (a newer keystroke arrived
    /// after they were scheduled) are discarded. Current expiries run the
    /// pure commit transition.
    pub fn resolve(&mut self, fired: Fired) -> Option<Emission> {
        if fired.generation != self.generation {
            tracing::debug!(
                fired = fired.generation,
                current = self.generation,
                "debounce: stale expiry discarded"
            );
            return None;
        }
        self.pending = None;
        let emission = self.state.commit(&fired.text);
        tracing::debug!(text = %fired.text, emission = ?emission, "debounce: committed");
        emission
    }

    /// Cancel the pending expiry, if any. In-flight expiries become stale.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.generation += 1;
    }

    /// Cancel and forget the committed query, returning to the initial
    /// state.
    pub fn reset(&mut self) {
        self.cancel();
        self.state.reset();
    }

    /// The most recently committed non-empty query, or `""`.
    pub fn last_committed(&self) -> &str {
        self.state.last_committed()
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
