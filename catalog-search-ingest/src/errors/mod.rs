//! Error types for the catalog ingest.

use catalog_search_repository::SearchError;
use thiserror::Error;

/// Errors that can occur while seeding the catalog.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The dataset is missing, unreadable or corrupt.
    #[error("Data source error: {0}")]
    DataSourceError(String),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),

    /// A blocking task panicked or was cancelled.
    #[error("Task error: {0}")]
    TaskError(String),
}

impl IngestError {
    /// Create a data source error.
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSourceError(msg.into())
    }
}

impl From<tokio::task::JoinError> for IngestError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskError(err.to_string())
    }
}
