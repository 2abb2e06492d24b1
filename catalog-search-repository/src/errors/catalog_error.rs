//! Catalog error types.
//!
//! These are the errors callers of [`CatalogClient`](crate::CatalogClient)
//! see. Engine failures are folded into them at the client boundary.

use thiserror::Error;

use super::SearchError;

/// Errors returned by catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// Malformed input such as a short query or a non-positive page.
    #[error("{0}")]
    Validation(String),

    /// The requested product does not exist.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The search engine failed or could not be reached.
    #[error("Search engine error: {0}")]
    Upstream(String),
}

impl CatalogError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}

impl From<SearchError> for CatalogError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NotFound(id) => Self::NotFound(id),
            other => Self::Upstream(other.to_string()),
        }
    }
}
