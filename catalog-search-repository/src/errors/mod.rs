//! Error types for the catalog search repository.

mod catalog_error;
mod search_error;

pub use catalog_error::CatalogError;
pub use search_error::SearchError;
