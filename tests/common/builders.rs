//! Test builders — ergonomic constructors for [`Book`] fixtures and catalog
//! responses.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning
//! `Result`.

use tome_core::{Book, SearchResponse};

// ---------------------------------------------------------------------------
// BookBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Book`] test fixtures.
///
/// # Example
///
/// ```rust
/// let book = BookBuilder::new("Dune")
///     .key("/works/OL45883W")
///     .author("Frank Herbert")
///     .cover(12345)
///     .year(1965)
///     .build();
/// ```
pub struct BookBuilder {
    key: String,
    title: String,
    author_name: Option<Vec<String>>,
    cover_i: Option<u64>,
    first_publish_year: Option<i32>,
    publisher: Option<Vec<String>>,
    edition_count: Option<u32>,
}

impl BookBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        // Derive a stable-looking work key so fixtures don't have to invent one
        let key = format!("/works/{}", title.replace(' ', "-"));
        Self {
            key,
            title,
            author_name: None,
            cover_i: None,
            first_publish_year: None,
            publisher: None,
            edition_count: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author_name
            .get_or_insert_with(Vec::new)
            .push(author.into());
        self
    }

    pub fn cover(mut self, cover_i: u64) -> Self {
        self.cover_i = Some(cover_i);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.first_publish_year = Some(year);
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher
            .get_or_insert_with(Vec::new)
            .push(publisher.into());
        self
    }

    pub fn editions(mut self, count: u32) -> Self {
        self.edition_count = Some(count);
        self
    }

    pub fn build(self) -> Book {
        Book {
            key: self.key,
            title: self.title,
            author_name: self.author_name,
            cover_i: self.cover_i,
            first_publish_year: self.first_publish_year,
            publisher: self.publisher,
            edition_count: self.edition_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Build a bare book with only a title.
pub fn book(title: &str) -> Book {
    BookBuilder::new(title).build()
}

/// The canonical two-item result set served by the fake catalog for any
/// query without scripted behaviour.
pub fn sample_books() -> Vec<Book> {
    vec![
        BookBuilder::new("Test Book 1")
            .key("/works/OL1234567M")
            .author("Test Author 1")
            .cover(12345)
            .year(2020)
            .build(),
        BookBuilder::new("Test Book 2")
            .key("/works/OL7654321M")
            .author("Test Author 2")
            .cover(54321)
            .year(2021)
            .build(),
    ]
}

/// Wrap books in a response envelope the way the catalog would.
pub fn response(books: Vec<Book>) -> SearchResponse {
    SearchResponse {
        num_found: books.len() as u64,
        start: 0,
        num_found_exact: true,
        docs: books,
    }
}
