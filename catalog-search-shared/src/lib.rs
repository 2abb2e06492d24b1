//! # Catalog Search Shared
//!
//! Types shared by the catalog search crates: the indexed product record,
//! the search parameters accepted over HTTP, and the response envelopes
//! returned to callers.

pub mod product;
pub mod response;
pub mod search;

pub use product::{ProductHit, ProductRecord};
pub use response::{Aggregations, Bucket, FieldStats, Recommendations, SearchPage};
pub use search::{SearchParams, SortOrder};
