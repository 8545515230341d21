//! Core types for tome-core.
//!
//! This module defines the catalog records shared across all layers: the
//! [`Book`] result item and the [`SearchResponse`] envelope it arrives in.
//! Both deserialize directly from the Open Library wire format and are passed
//! through to the UI unmodified.

use serde::Deserialize;

/// A single catalog result.
///
/// Every field except `key` and `title` is optional. The catalogue populates
/// as many fields as it knows for a work; the remainder are left as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Book {
    /// Stable work identifier (e.g. `/works/OL45883W`).
    pub key: String,
    /// Work title as catalogued.
    pub title: String,
    /// Author display names, in catalogue order.
    pub author_name: Option<Vec<String>>,
    /// Cover image identifier, when a scanned cover exists.
    pub cover_i: Option<u64>,
    /// Year of the earliest known edition.
    pub first_publish_year: Option<i32>,
    /// Publisher names across editions.
    pub publisher: Option<Vec<String>>,
    /// Number of catalogued editions.
    pub edition_count: Option<u32>,
}

impl Book {
    /// Authors joined with `", "`, or a fixed fallback when the catalogue
    /// lists none.
    pub fn author_line(&self) -> String {
        match &self.author_name {
            Some(names) if !names.is_empty() => names.join(", "),
            _ => "Unknown author".to_string(),
        }
    }

    /// First listed author, if any.
    pub fn first_author(&self) -> Option<&str> {
        self.author_name
            .as_ref()
            .and_then(|names| names.first())
            .map(String::as_str)
    }

    /// Whether the catalogue has a cover scan for this work.
    pub fn has_cover(&self) -> bool {
        self.cover_i.is_some()
    }
}

/// The catalog search envelope.
///
/// `docs` is the items collection; a body without it does not deserialize and
/// is treated as structurally invalid by the lookup layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    /// Total number of matching works in the catalogue.
    #[serde(rename = "numFound")]
    pub num_found: u64,
    /// Offset of the first returned item.
    #[serde(default)]
    pub start: u64,
    /// Whether `num_found` is exact or an estimate.
    #[serde(rename = "numFoundExact", default)]
    pub num_found_exact: bool,
    /// The returned result items, capped by the request's `limit`.
    pub docs: Vec<Book>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
