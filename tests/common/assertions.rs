//! Domain-specific assertion macros for tome harnesses.
//!
//! These wrap plain assertions with context-rich failure messages that make
//! it clear *which* search-state invariant was violated.

// ---------------------------------------------------------------------------
// State assertions
// ---------------------------------------------------------------------------

/// Assert that a `SearchManager` holds a successful result set with exactly
/// the given titles, in order.
///
/// ```rust
/// assert_succeeded_titles!(manager, ["Test Book 1", "Test Book 2"]);
/// ```
#[macro_export]
macro_rules! assert_succeeded_titles {
    ($manager:expr, $titles:expr) => {{
        let state = $manager.state();
        let expected: Vec<&str> = $titles.into_iter().collect();
        match state {
            tome_core::search::SearchState::Succeeded(books) => {
                let actual: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
                assert_eq!(
                    actual, expected,
                    "assert_succeeded_titles! failed: wrong result set"
                );
            }
            other => panic!(
                "assert_succeeded_titles! failed: expected Succeeded({:?}), state is {:?}",
                expected, other
            ),
        }
        assert!(!state.is_loading());
        assert!(state.error().is_none());
    }};
}

/// Assert that a `SearchManager` failed with a message containing the given
/// fragment, and that the failure left no items behind.
#[macro_export]
macro_rules! assert_failed_contains {
    ($manager:expr, $fragment:expr) => {{
        let state = $manager.state();
        let fragment: &str = $fragment;
        match state.error() {
            Some(err) if err.message().contains(fragment) => {}
            Some(err) => panic!(
                "assert_failed_contains! failed:\n  expected message containing: {:?}\n  actual: {:?}",
                fragment,
                err.message()
            ),
            None => panic!(
                "assert_failed_contains! failed: state is not Failed, it is {:?}",
                state
            ),
        }
        assert!(!state.is_loading());
        assert!(state.books().is_empty());
    }};
}
