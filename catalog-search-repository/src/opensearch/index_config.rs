//! OpenSearch index configuration and mappings.
//!
//! This module defines the mappings for the product index. The field types
//! are fixed; clients and the dataset depend on them.

use serde_json::{json, Value};

/// Default name of the product index.
pub const DEFAULT_INDEX_NAME: &str = "products";

/// Get the mappings for the product index.
///
/// - **text**: `name`, analyzed for full-text matching
/// - **keyword**: categories, URIs and the SKU, matched exactly
/// - **float / integer**: ratings and prices, used by range filters and stats
pub fn get_index_settings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "name": { "type": "text" },
                "main_category": { "type": "keyword" },
                "sub_category": { "type": "keyword" },
                "image": { "type": "keyword" },
                "link": { "type": "keyword" },
                "ratings": { "type": "float" },
                "no_of_ratings": { "type": "integer" },
                "discount_price": { "type": "float" },
                "actual_price": { "type": "float" },
                "asin": { "type": "keyword" }
            }
        }
    })
}
