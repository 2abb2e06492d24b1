//! # Catalog Search Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search engine that backs the product catalog. It includes the engine
//! interface, a concrete implementation for OpenSearch, the query builders
//! and response parsers, and the [`CatalogClient`] that ties them together.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::CatalogClient;
pub use config::{CatalogConfig, EngineConfig};
pub use errors::{CatalogError, SearchError};
pub use interfaces::SearchEngineClient;
pub use opensearch::OpenSearchClient;
pub use types::BulkStats;
