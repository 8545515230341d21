//! tome-catalog — catalog lookup adapter for tome.
//!
//! The catalog is the application's single external collaborator. This crate
//! defines the [`Catalog`] seam the search layer dispatches through, the
//! production [`OpenLibrary`] backend, and the normalization of every lookup
//! failure into the one error shape the state machine carries.

use tome_core::search::SearchError;
use tome_core::{Book, SearchResponse};

pub mod openlibrary;

pub use openlibrary::{purchase_url, CatalogError, OpenLibrary, MAX_RESULTS};

/// Trait implemented by catalog backends.
///
/// Production uses [`OpenLibrary`]; tests substitute scripted responders.
pub trait Catalog: Send + Sync + 'static {
    /// Look up `query`, returning at most the backend's result cap.
    fn search(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<SearchResponse, CatalogError>> + Send;
}

/// Run one lookup and normalize any failure into a [`SearchError`].
///
/// This is the only path between the dispatcher and a backend; nothing it
/// returns can carry a panic or a raw transport error past the search entry
/// point.
pub async fn lookup<C: Catalog>(catalog: &C, query: &str) -> Result<Vec<Book>, SearchError> {
    match catalog.search(query).await {
        Ok(response) => Ok(response.docs),
        Err(err) => {
            tracing::debug!(query = %query, error = %err, "catalog: lookup failed");
            Err(err.into())
        }
    }
}
