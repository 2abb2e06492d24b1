//! OpenSearch response parsing.
//!
//! Maps raw engine responses onto the catalog's response types.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::BulkStats;
use catalog_search_shared::{Aggregations, Bucket, FieldStats, ProductHit, ProductRecord};

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: ProductRecord,
}

/// Parse a single search hit or document response into a product.
pub fn parse_hit(hit: &Value) -> Result<ProductHit, SearchError> {
    let raw = RawHit::deserialize(hit)
        .map_err(|e| SearchError::parse(format!("Invalid hit: {}", e)))?;
    Ok(ProductHit::new(raw.id, raw.source))
}

/// Parse a get-document response, treating `found: false` as not found.
pub fn parse_document(id: &str, document: &Value) -> Result<ProductHit, SearchError> {
    if document.get("found").and_then(Value::as_bool) == Some(false) {
        return Err(SearchError::not_found(id));
    }
    parse_hit(document)
}

/// Extract the hit list of a search response.
pub fn parse_hits(response: &Value) -> Result<Vec<ProductHit>, SearchError> {
    let hits = response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::parse("Response has no hits array"))?;

    hits.iter().map(parse_hit).collect()
}

/// Extract the total hit count of a search response.
///
/// Accepts both `{"value": n}` and the older bare-number form.
pub fn parse_total(response: &Value) -> u64 {
    match response.pointer("/hits/total") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(total) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
        None => 0,
    }
}

/// Extract the facet aggregations of an aggregation response.
pub fn parse_aggregations(response: &Value) -> Result<Aggregations, SearchError> {
    let aggs = response
        .get("aggregations")
        .ok_or_else(|| SearchError::parse("Response has no aggregations"))?;

    Ok(Aggregations {
        categories: parse_buckets(aggs, "main_categories")?,
        subcategories: parse_buckets(aggs, "sub_categories")?,
        price_stats: parse_stats(aggs, "price_stats")?,
        rating_stats: parse_stats(aggs, "rating_stats")?,
    })
}

fn parse_buckets(aggs: &Value, name: &str) -> Result<Vec<Bucket>, SearchError> {
    match aggs.get(name).and_then(|agg| agg.get("buckets")) {
        Some(buckets) => Vec::<Bucket>::deserialize(buckets)
            .map_err(|e| SearchError::parse(format!("Invalid {} buckets: {}", name, e))),
        None => Ok(Vec::new()),
    }
}

fn parse_stats(aggs: &Value, name: &str) -> Result<FieldStats, SearchError> {
    match aggs.get(name) {
        Some(stats) => FieldStats::deserialize(stats)
            .map_err(|e| SearchError::parse(format!("Invalid {}: {}", name, e))),
        None => Ok(FieldStats::default()),
    }
}

/// Count accepted and rejected items in a bulk response.
pub fn parse_bulk_response(response: &Value, expected: usize) -> BulkStats {
    let Some(items) = response.get("items").and_then(Value::as_array) else {
        // No per-item detail; trust the top-level flag.
        return if response.get("errors").and_then(Value::as_bool) == Some(true) {
            BulkStats::all_failed(expected)
        } else {
            BulkStats::new(expected, 0)
        };
    };

    let failed = items
        .iter()
        .filter(|item| {
            item.as_object()
                .and_then(|op| op.values().next())
                .map(|result| {
                    result.get("error").is_some()
                        || result
                            .get("status")
                            .and_then(Value::as_u64)
                            .is_some_and(|status| status >= 300)
                })
                .unwrap_or(true)
        })
        .count();

    BulkStats::new(items.len() - failed, failed)
}
