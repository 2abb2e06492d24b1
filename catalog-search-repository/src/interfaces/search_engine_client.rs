//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::BulkStats;
use catalog_search_shared::ProductRecord;

/// Abstract interface for search engine operations against the product index.
///
/// Query bodies and raw responses are passed as JSON in the engine's query
/// DSL; building and interpreting them is the job of
/// [`queries`](crate::opensearch::queries) and
/// [`responses`](crate::opensearch::responses). Implementations only move
/// them over the wire, which keeps the translator testable against a mock.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>` for consistent error handling.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Execute a search request body against the product index.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The raw engine response
    /// * `Err(SearchError)` - If the request fails or the engine rejects it
    async fn search(&self, body: &Value) -> Result<Value, SearchError>;

    /// Fetch a single document by its engine-assigned id.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The raw document response (`_id`, `_source`, ...)
    /// * `Err(SearchError::NotFound)` - If no document has this id
    /// * `Err(SearchError)` - On any other failure
    async fn get_document(&self, id: &str) -> Result<Value, SearchError>;

    /// Count the documents in the product index.
    ///
    /// A missing index counts as empty.
    async fn count(&self) -> Result<u64, SearchError>;

    /// Check whether the product index exists.
    async fn index_exists(&self) -> Result<bool, SearchError>;

    /// Delete the product index. Succeeds if the index is already absent.
    async fn delete_index(&self) -> Result<(), SearchError>;

    /// Create the product index with the given settings and mappings.
    ///
    /// An "already exists" answer from the engine is not an error.
    async fn create_index(&self, settings: &Value) -> Result<(), SearchError>;

    /// Index documents in a single bulk request.
    ///
    /// The engine assigns document ids.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkStats)` - Accepted and rejected document counts
    /// * `Err(SearchError::BulkIndexError)` - If the request failed as a whole
    async fn bulk_index(&self, documents: &[ProductRecord]) -> Result<BulkStats, SearchError>;

    /// Make recently indexed documents visible to search and count.
    async fn refresh(&self) -> Result<(), SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster status is green or yellow
    /// * `Ok(false)` - If the cluster is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
