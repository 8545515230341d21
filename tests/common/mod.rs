#![allow(dead_code)]
//! Shared test utilities for tome integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Timing-sensitive helpers are designed to be
//! deterministic with `tokio::time::pause()`.

pub mod assertions;
pub mod builders;
pub mod fake_catalog;
pub mod stub_catalog;

pub use builders::*;
pub use fake_catalog::*;
pub use stub_catalog::*;
