//! Search parameters accepted by the catalog search endpoint.

/// Default page size when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 20;

/// Result ordering requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first by discounted price.
    PriceAsc,
    /// Most expensive first by discounted price.
    PriceDesc,
    /// Highest rated first.
    RatingDesc,
    /// Descending match score.
    #[default]
    Relevance,
}

impl SortOrder {
    /// Resolve a raw `sort` parameter.
    ///
    /// Absent or unrecognized values fall back to [`SortOrder::Relevance`].
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("rating_desc") => Self::RatingDesc,
            _ => Self::Relevance,
        }
    }
}

/// Unvalidated search parameters.
///
/// `page` and `limit` are signed so that out-of-range input survives parsing
/// and is rejected by validation with a proper message. Price and rating
/// bounds are `Some` only when the caller supplied them, so a bound of `0`
/// is honored.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Free-text query.
    pub q: Option<String>,
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub limit: i64,
    /// Accepted main categories.
    pub category: Vec<String>,
    /// Accepted sub categories.
    pub subcategory: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    /// Result ordering.
    pub sort: SortOrder,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: None,
            page: 1,
            limit: DEFAULT_LIMIT,
            category: Vec::new(),
            subcategory: Vec::new(),
            min_price: None,
            max_price: None,
            min_rating: None,
            max_rating: None,
            sort: SortOrder::Relevance,
        }
    }
}

impl SearchParams {
    /// Create parameters for a text query with default paging.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category.push(category.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory.push(subcategory.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_rating_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_rating = min;
        self.max_rating = max;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_from_param() {
        assert_eq!(SortOrder::from_param(Some("price_asc")), SortOrder::PriceAsc);
        assert_eq!(SortOrder::from_param(Some("price_desc")), SortOrder::PriceDesc);
        assert_eq!(SortOrder::from_param(Some("rating_desc")), SortOrder::RatingDesc);
        assert_eq!(SortOrder::from_param(Some("relevance")), SortOrder::Relevance);
    }

    #[test]
    fn test_sort_order_falls_back_to_relevance() {
        assert_eq!(SortOrder::from_param(None), SortOrder::Relevance);
        assert_eq!(SortOrder::from_param(Some("")), SortOrder::Relevance);
        assert_eq!(SortOrder::from_param(Some("newest")), SortOrder::Relevance);
        assert_eq!(SortOrder::from_param(Some("PRICE_ASC")), SortOrder::Relevance);
    }

    #[test]
    fn test_default_params() {
        let params = SearchParams::new("headphones");

        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.sort, SortOrder::Relevance);
        assert!(params.category.is_empty());
        assert!(params.min_price.is_none());
    }

    #[test]
    fn test_zero_bound_is_kept() {
        let params = SearchParams::new("cable").with_price_range(Some(0.0), None);
        assert_eq!(params.min_price, Some(0.0));
        assert!(params.max_price.is_none());
    }
}
