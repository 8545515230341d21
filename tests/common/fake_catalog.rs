//! Fake Open Library server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1, serving `GET /search.json` with behaviour scripted by the
//! query string:
//!
//! - `q=empty`   → a well-formed response with zero items
//! - `q=error`   → HTTP 500
//! - `q=invalid` → a JSON body without the `docs` collection
//! - anything else → the canonical two-item result set
//!
//! Every request's query parameters are recorded so harnesses can assert on
//! the `limit` cap. Point an [`tome_catalog::OpenLibrary`] client at
//! [`FakeCatalog::base_url`].
//!
//! # Example
//!
//! ```rust,no_run
//! # tokio_test::block_on(async {
//! use common::fake_catalog::FakeCatalog;
//!
//! let api = FakeCatalog::start().await.unwrap();
//! let client = tome_catalog::OpenLibrary::with_base_url(api.base_url());
//! # });
//! ```

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// State shared between the router and test code.
#[derive(Default)]
struct ApiState {
    /// Query parameters of every request received, in arrival order.
    requests: Vec<HashMap<String, String>>,
}

/// Handle to the running fake catalog server.
pub struct FakeCatalog {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeCatalog {
    /// Start the fake catalog on a random port. Returns once the server is
    /// listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route("/search.json", get(search))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Query parameters of every request received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.state.lock().unwrap().requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handler
// ---------------------------------------------------------------------------

async fn search(
    State(state): State<Arc<Mutex<ApiState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.lock().unwrap().requests.push(params.clone());

    match params.get("q").map(String::as_str) {
        Some("empty") => Json(serde_json::json!({
            "numFound": 0,
            "start": 0,
            "numFoundExact": true,
            "docs": []
        }))
        .into_response(),
        Some("error") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Some("invalid") => Json(serde_json::json!({
            "error": "Invalid response format"
        }))
        .into_response(),
        _ => Json(serde_json::json!({
            "numFound": 2,
            "start": 0,
            "numFoundExact": true,
            "docs": [
                {
                    "key": "/works/OL1234567M",
                    "title": "Test Book 1",
                    "author_name": ["Test Author 1"],
                    "cover_i": 12345,
                    "first_publish_year": 2020
                },
                {
                    "key": "/works/OL7654321M",
                    "title": "Test Book 2",
                    "author_name": ["Test Author 2"],
                    "cover_i": 54321,
                    "first_publish_year": 2021
                }
            ]
        }))
        .into_response(),
    }
}
