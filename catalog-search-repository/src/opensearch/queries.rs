//! OpenSearch query builders.
//!
//! This module turns catalog search parameters into OpenSearch request
//! bodies. A search produces two bodies: one for the page of hits, carrying
//! every filter, and one for facet counts, carrying only the text clause so
//! that facets reflect the query rather than the caller's own filters.

use serde_json::{json, Map, Value};

use crate::errors::CatalogError;
use catalog_search_shared::{ProductHit, SearchParams, SortOrder};

/// Minimum number of characters in a search query.
pub const MIN_QUERY_LENGTH: usize = 3;

/// Fields searched by the full-text clause, with boosts.
pub const TEXT_FIELDS: [&str; 4] = ["name^2", "description", "main_category", "sub_category"];

/// Fields compared by the similarity query.
pub const SIMILARITY_FIELDS: [&str; 4] = ["name", "description", "main_category", "sub_category"];

/// Number of buckets returned per categorical facet.
pub const FACET_SIZE: u32 = 50;

const MIN_TERM_FREQ: u32 = 1;
const MAX_QUERY_TERMS: u32 = 25;
const MIN_DOC_FREQ: u32 = 1;

/// The pair of request bodies issued for one search.
#[derive(Debug, Clone)]
pub struct SearchRequests {
    /// Filtered, sorted and paginated request for the result page.
    pub hits: Value,
    /// Unfiltered, zero-size request for facet counts.
    pub aggregations: Value,
    /// Validated page number.
    pub page: u32,
    /// Effective page size after capping.
    pub limit: u32,
}

/// Build the hits and aggregation requests for a search.
///
/// Validation happens first; no body is produced for invalid input.
pub fn build_search_requests(
    params: &SearchParams,
    max_page_size: u32,
) -> Result<SearchRequests, CatalogError> {
    let query_text = validate_query(params.q.as_deref())?;
    let page = validate_page(params.page)?;
    let limit = validate_limit(params.limit, max_page_size)?;

    let from = u64::from(page - 1) * u64::from(limit);
    let text_clause = build_text_clause(query_text);

    let hits = json!({
        "query": {
            "bool": {
                "must": [text_clause.clone()],
                "filter": build_filter_clauses(params)
            }
        },
        "from": from,
        "size": limit,
        "sort": build_sort_clause(params.sort),
        "track_total_hits": true
    });

    let aggregations = json!({
        "query": {
            "bool": {
                "must": [text_clause]
            }
        },
        "size": 0,
        "aggs": build_aggregations()
    });

    Ok(SearchRequests {
        hits,
        aggregations,
        page,
        limit,
    })
}

fn validate_query(q: Option<&str>) -> Result<&str, CatalogError> {
    match q.map(str::trim) {
        Some(text) if text.chars().count() >= MIN_QUERY_LENGTH => Ok(text),
        _ => Err(CatalogError::validation(format!(
            "Search query must be at least {} characters long.",
            MIN_QUERY_LENGTH
        ))),
    }
}

fn validate_page(page: i64) -> Result<u32, CatalogError> {
    if page < 1 {
        return Err(CatalogError::validation(
            "Page number must be greater than or equal to 1.",
        ));
    }
    u32::try_from(page).map_err(|_| CatalogError::validation("Page number is too large."))
}

/// Validate a page size and clamp it to `max_page_size`.
pub fn validate_limit(limit: i64, max_page_size: u32) -> Result<u32, CatalogError> {
    if limit < 1 {
        return Err(CatalogError::validation(
            "Limit must be greater than or equal to 1.",
        ));
    }
    let max = i64::from(max_page_size.max(1));
    // Bounded by max, which came from a u32.
    Ok(limit.min(max) as u32)
}

/// Build the full-text clause shared by the hits and aggregation requests.
pub fn build_text_clause(query_text: &str) -> Value {
    json!({
        "multi_match": {
            "query": query_text,
            "fields": TEXT_FIELDS
        }
    })
}

/// Build the exact-match and range filters for a search.
///
/// Only supplied parameters produce clauses; a bound of `0` is supplied.
pub fn build_filter_clauses(params: &SearchParams) -> Vec<Value> {
    let mut filters = Vec::new();

    if !params.category.is_empty() {
        filters.push(json!({ "terms": { "main_category": params.category } }));
    }

    if !params.subcategory.is_empty() {
        filters.push(json!({ "terms": { "sub_category": params.subcategory } }));
    }

    if let Some(range) = build_range("discount_price", params.min_price, params.max_price) {
        filters.push(range);
    }

    if let Some(range) = build_range("ratings", params.min_rating, params.max_rating) {
        filters.push(range);
    }

    filters
}

fn build_range(field: &str, min: Option<f64>, max: Option<f64>) -> Option<Value> {
    if min.is_none() && max.is_none() {
        return None;
    }

    let mut bounds = Map::new();
    if let Some(min) = min {
        bounds.insert("gte".to_string(), json!(min));
    }
    if let Some(max) = max {
        bounds.insert("lte".to_string(), json!(max));
    }

    Some(json!({ "range": { field: bounds } }))
}

/// Build the sort clause for a result ordering.
pub fn build_sort_clause(sort: SortOrder) -> Value {
    match sort {
        SortOrder::PriceAsc => json!([{ "discount_price": "asc" }]),
        SortOrder::PriceDesc => json!([{ "discount_price": "desc" }]),
        SortOrder::RatingDesc => json!([{ "ratings": "desc" }]),
        SortOrder::Relevance => json!(["_score"]),
    }
}

/// Build the facet aggregations: category buckets and price/rating stats.
pub fn build_aggregations() -> Value {
    json!({
        "main_categories": {
            "terms": { "field": "main_category", "size": FACET_SIZE }
        },
        "sub_categories": {
            "terms": { "field": "sub_category", "size": FACET_SIZE }
        },
        "price_stats": {
            "stats": { "field": "discount_price" }
        },
        "rating_stats": {
            "stats": { "field": "ratings" }
        }
    })
}

/// Build a content-based similarity query seeded by a product's text fields.
///
/// The source document is excluded by id in the query itself; callers still
/// drop it from the results.
pub fn build_more_like_this_query(source: &ProductHit, size: u32) -> Value {
    json!({
        "query": {
            "bool": {
                "must": [{
                    "more_like_this": {
                        "fields": SIMILARITY_FIELDS,
                        "like": source.product.similarity_text(),
                        "min_term_freq": MIN_TERM_FREQ,
                        "max_query_terms": MAX_QUERY_TERMS,
                        "min_doc_freq": MIN_DOC_FREQ
                    }
                }],
                "must_not": [
                    { "ids": { "values": [source.id] } }
                ]
            }
        },
        "size": size
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_search_shared::ProductRecord;

    #[test]
    fn test_price_sorted_second_page() {
        let params = SearchParams::new("head")
            .with_price_range(Some(100.0), None)
            .with_sort(SortOrder::PriceAsc)
            .with_page(2)
            .with_limit(10);

        let requests = build_search_requests(&params, 100).unwrap();

        assert_eq!(requests.hits["from"], 10);
        assert_eq!(requests.hits["size"], 10);
        assert_eq!(requests.hits["sort"], json!([{ "discount_price": "asc" }]));

        let filter = requests.hits["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(filter[0], json!({ "range": { "discount_price": { "gte": 100.0 } } }));
    }

    #[test]
    fn test_offset_is_page_times_limit() {
        for (page, limit) in [(1, 1), (1, 20), (3, 7), (10, 100), (250, 40)] {
            let params = SearchParams::new("laptop").with_page(page).with_limit(limit);
            let requests = build_search_requests(&params, 100).unwrap();

            assert_eq!(requests.hits["from"], json!((page - 1) * limit));
            assert_eq!(requests.hits["size"], json!(limit));
        }
    }

    #[test]
    fn test_short_query_is_rejected() {
        let err = build_search_requests(&SearchParams::new("ab"), 100).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = build_search_requests(&SearchParams::default(), 100).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = build_search_requests(&SearchParams::new("  ab  "), 100).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_query_length_counts_characters() {
        assert!(build_search_requests(&SearchParams::new("çà€"), 100).is_ok());
    }

    #[test]
    fn test_non_positive_page_is_rejected() {
        for page in [0, -1] {
            let params = SearchParams::new("phone").with_page(page);
            let err = build_search_requests(&params, 100).unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }
    }

    #[test]
    fn test_limit_is_capped() {
        let params = SearchParams::new("phone").with_limit(5000);
        let requests = build_search_requests(&params, 100).unwrap();

        assert_eq!(requests.limit, 100);
        assert_eq!(requests.hits["size"], 100);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let params = SearchParams::new("phone").with_limit(0);
        assert!(build_search_requests(&params, 100).is_err());
    }

    #[test]
    fn test_text_clause_fields() {
        let clause = build_text_clause("wireless");

        assert_eq!(clause["multi_match"]["query"], "wireless");
        assert_eq!(
            clause["multi_match"]["fields"],
            json!(["name^2", "description", "main_category", "sub_category"])
        );
    }

    #[test]
    fn test_filter_clauses_for_category_sets() {
        let params = SearchParams::new("shoes")
            .with_category("men's shoes")
            .with_category("women's shoes")
            .with_subcategory("Sports Shoes");

        let filters = build_filter_clauses(&params);

        assert_eq!(filters.len(), 2);
        assert_eq!(
            filters[0]["terms"]["main_category"],
            json!(["men's shoes", "women's shoes"])
        );
        assert_eq!(filters[1]["terms"]["sub_category"], json!(["Sports Shoes"]));
    }

    #[test]
    fn test_zero_bounds_are_kept() {
        let params = SearchParams::new("cable")
            .with_price_range(Some(0.0), Some(500.0))
            .with_rating_range(Some(0.0), None);

        let filters = build_filter_clauses(&params);

        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0]["range"]["discount_price"], json!({ "gte": 0.0, "lte": 500.0 }));
        assert_eq!(filters[1]["range"]["ratings"], json!({ "gte": 0.0 }));
    }

    #[test]
    fn test_no_filters_without_params() {
        assert!(build_filter_clauses(&SearchParams::new("cable")).is_empty());
    }

    #[test]
    fn test_sort_clauses() {
        assert_eq!(build_sort_clause(SortOrder::PriceDesc), json!([{ "discount_price": "desc" }]));
        assert_eq!(build_sort_clause(SortOrder::RatingDesc), json!([{ "ratings": "desc" }]));
        assert_eq!(build_sort_clause(SortOrder::Relevance), json!(["_score"]));
    }

    #[test]
    fn test_unknown_sort_uses_relevance() {
        let params = SearchParams::new("watch").with_sort(SortOrder::from_param(Some("cheapest")));
        let requests = build_search_requests(&params, 100).unwrap();

        assert_eq!(requests.hits["sort"], json!(["_score"]));
    }

    #[test]
    fn test_aggregation_request_ignores_filters() {
        let params = SearchParams::new("headphones")
            .with_category("electronics")
            .with_price_range(Some(10.0), Some(90.0))
            .with_rating_range(Some(4.0), None)
            .with_sort(SortOrder::PriceDesc)
            .with_page(3);

        let requests = build_search_requests(&params, 100).unwrap();
        let unfiltered = build_search_requests(&SearchParams::new("headphones"), 100).unwrap();

        assert_eq!(requests.aggregations, unfiltered.aggregations);
        assert!(requests.aggregations["query"]["bool"].get("filter").is_none());
        assert_eq!(requests.aggregations["size"], 0);
        assert!(requests.aggregations.get("sort").is_none());
        assert!(requests.aggregations.get("from").is_none());
        assert!(requests.hits.get("aggs").is_none());
    }

    #[test]
    fn test_aggregations_structure() {
        let aggs = build_aggregations();

        assert_eq!(aggs["main_categories"]["terms"]["field"], "main_category");
        assert_eq!(aggs["main_categories"]["terms"]["size"], 50);
        assert_eq!(aggs["sub_categories"]["terms"]["field"], "sub_category");
        assert_eq!(aggs["price_stats"]["stats"]["field"], "discount_price");
        assert_eq!(aggs["rating_stats"]["stats"]["field"], "ratings");
    }

    #[test]
    fn test_more_like_this_query() {
        let mut product = ProductRecord::named("Bluetooth Speaker");
        product.main_category = Some("tv, audio & cameras".to_string());
        let source = ProductHit::new("doc-1", product);

        let query = build_more_like_this_query(&source, 6);
        let mlt = &query["query"]["bool"]["must"][0]["more_like_this"];

        assert_eq!(mlt["like"], json!(["Bluetooth Speaker", "tv, audio & cameras"]));
        assert_eq!(mlt["min_term_freq"], 1);
        assert_eq!(mlt["max_query_terms"], 25);
        assert_eq!(mlt["min_doc_freq"], 1);
        assert_eq!(query["query"]["bool"]["must_not"][0]["ids"]["values"], json!(["doc-1"]));
        assert_eq!(query["size"], 6);
    }
}
