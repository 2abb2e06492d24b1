//! Response envelopes returned by the catalog API.

use serde::{Deserialize, Serialize};

use crate::product::ProductHit;

/// Aggregation bucket: a categorical value and its matching document count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: String,
    pub doc_count: u64,
}

/// Summary statistics over a numeric field.
///
/// `min`, `max` and `avg` are `None` when no document matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub sum: f64,
}

/// Facet counts computed from the text query alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregations {
    pub categories: Vec<Bucket>,
    pub subcategories: Vec<Bucket>,
    pub price_stats: FieldStats,
    pub rating_stats: FieldStats,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<ProductHit>,
    /// Total number of matching documents.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub aggregations: Aggregations,
}

impl SearchPage {
    /// Number of pages needed to show `total` hits at `limit` per page.
    pub fn page_count(total: u64, limit: u32) -> u64 {
        if limit == 0 {
            return 0;
        }
        total.div_ceil(u64::from(limit))
    }
}

/// Products similar to a given product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub results: Vec<ProductHit>,
    pub total: usize,
}

impl Recommendations {
    pub fn new(results: Vec<ProductHit>) -> Self {
        Self {
            total: results.len(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(SearchPage::page_count(0, 10), 0);
        assert_eq!(SearchPage::page_count(10, 10), 1);
        assert_eq!(SearchPage::page_count(11, 10), 2);
        assert_eq!(SearchPage::page_count(95, 20), 5);
    }

    #[test]
    fn test_empty_stats_serialize_null() {
        let value = serde_json::to_value(FieldStats::default()).unwrap();

        assert_eq!(value["count"], 0);
        assert!(value["min"].is_null());
        assert!(value["avg"].is_null());
        assert_eq!(value["sum"], 0.0);
    }
}
