//! Full-text search - query parsing, composition, and execution

pub mod client;
pub mod dsl;
pub mod engine;
pub mod filters;
pub mod query_string;

pub use client::{DocumentIndex, IndexClient};
pub use engine::SearchEngine;
