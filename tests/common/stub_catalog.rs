//! In-process catalog stubs for exercising the dispatch conventions without
//! a network.
//!
//! [`GatedCatalog`] parks every lookup on a oneshot gate so a harness can
//! settle overlapping lookups in whatever order it wants — the tool for the
//! superseded-ticket property. [`PanickingCatalog`] blows up inside the
//! lookup, modelling a backend failure that produces no error value at all.

use std::sync::Mutex;
use tokio::sync::oneshot;
use tome_catalog::{Catalog, CatalogError};
use tome_core::SearchResponse;

/// A catalog whose lookups block until the test releases them.
#[derive(Default)]
pub struct GatedCatalog {
    pending: Mutex<Vec<(String, oneshot::Sender<SearchResponse>)>>,
}

impl GatedCatalog {
    /// Number of lookups currently parked on their gate.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Release the parked lookup for `query` with the given response.
    ///
    /// # Panics
    ///
    /// Panics if no lookup for `query` is parked.
    pub fn release(&self, query: &str, response: SearchResponse) {
        let mut pending = self.pending.lock().unwrap();
        let idx = pending
            .iter()
            .position(|(q, _)| q == query)
            .unwrap_or_else(|| panic!("no parked lookup for query {query:?}"));
        let (_, tx) = pending.remove(idx);
        let _ = tx.send(response);
    }
}

impl Catalog for GatedCatalog {
    async fn search(&self, query: &str) -> Result<SearchResponse, CatalogError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push((query.to_string(), tx));
        Ok(rx.await.expect("gate dropped before release"))
    }
}

/// A catalog that panics inside every lookup.
pub struct PanickingCatalog;

impl Catalog for PanickingCatalog {
    async fn search(&self, _query: &str) -> Result<SearchResponse, CatalogError> {
        panic!("catalog backend exploded");
    }
}
