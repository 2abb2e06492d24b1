//! # Catalog Search Ingest
//!
//! This crate provides the ingest components for loading the product
//! dataset into the search index.
//!
//! ## Architecture
//!
//! The ingest follows the Reader-Processor-Loader pattern:
//!
//! 1. **Dataset**: Reads product rows from a CSV file or ZIP archive
//! 2. **Processor**: Transforms rows into product records
//! 3. **Loader**: Bulk indexes records into the search engine
//! 4. **Seeder**: Coordinates the ingest flow and guards the index

pub mod dataset;
pub mod errors;
pub mod loader;
pub mod processor;
pub mod seeder;

pub use dataset::DatasetSource;
pub use errors::IngestError;
pub use loader::{BulkLoader, LoadSummary, LoaderConfig};
pub use seeder::{CatalogSeeder, SeedOutcome};
