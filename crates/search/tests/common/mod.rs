//! Test infrastructure for the query engine.
//!
//! Fixture builders for feature data and a tracing layer that captures
//! warnings so tests can assert how many recoverable failures were logged.

#![allow(dead_code)]

pub mod capture;
pub mod fixtures;

// Re-export commonly used items
pub use capture::*;
pub use fixtures::*;
