//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using OpenSearch as the backend, along with the query DSL builders and
//! response parsers used by the catalog client.

mod client;
mod index_config;
pub mod queries;
pub mod responses;

pub use client::OpenSearchClient;
pub use index_config::{get_index_settings, DEFAULT_INDEX_NAME};
