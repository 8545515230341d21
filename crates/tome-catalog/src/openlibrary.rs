//! Open Library search backend.
//!
//! One endpoint: `GET {base}/search.json?q=<query>&limit=5`. The base URL is
//! injectable so integration tests can point the client at a local fake
//! server; everything else about the request is fixed.

use tome_core::search::SearchError;
use tome_core::{Book, SearchResponse};

use crate::Catalog;

/// Production catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Fixed result cap sent as the `limit` query parameter.
pub const MAX_RESULTS: u32 = 5;

/// Why a lookup failed.
///
/// Every variant renders to a human-readable message; conversion into
/// [`SearchError`] keeps that message and nothing else.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The request never produced a response (connect/read fault).
    #[error("catalog request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The catalog answered with a non-success status.
    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),
    /// The body did not deserialize into a [`SearchResponse`].
    #[error("Invalid response format from API")]
    InvalidBody(#[source] reqwest::Error),
}

impl From<CatalogError> for SearchError {
    fn from(err: CatalogError) -> Self {
        SearchError::new(err.to_string())
    }
}

/// HTTP client for the Open Library search API.
#[derive(Debug, Clone)]
pub struct OpenLibrary {
    http: reqwest::Client,
    base_url: String,
}

impl OpenLibrary {
    /// Client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternate endpoint (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for OpenLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for OpenLibrary {
    async fn search(&self, query: &str) -> Result<SearchResponse, CatalogError> {
        let url = format!("{}/search.json", self.base_url);
        tracing::debug!(query = %query, limit = MAX_RESULTS, "catalog: lookup");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", &MAX_RESULTS.to_string())])
            .send()
            .await
            .map_err(CatalogError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        response.json::<SearchResponse>().await.map_err(|err| {
            if err.is_decode() {
                CatalogError::InvalidBody(err)
            } else {
                CatalogError::Transport(err)
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Result links
// ---------------------------------------------------------------------------

/// Bookstore search URL for a result: title plus first author, restricted to
/// the books department.
pub fn purchase_url(book: &Book) -> String {
    let mut keywords = book.title.clone();
    if let Some(author) = book.first_author() {
        keywords.push(' ');
        keywords.push_str(author);
    }

    reqwest::Url::parse_with_params(
        "https://www.amazon.com/s",
        &[("k", keywords.as_str()), ("i", "stripbooks")],
    )
    .expect("bookstore base URL must parse")
    .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
