//! Processor module for the catalog ingest.
//!
//! Transforms raw dataset rows into `ProductRecord` structures for indexing.

use tracing::{debug, instrument};

use catalog_search_shared::ProductRecord;

/// A dataset row as read from CSV, every cell still text.
///
/// Unknown columns are ignored; missing and empty ones are `None`.
#[derive(Debug, Clone, Default)]
pub struct ProductRow {
    pub name: Option<String>,
    pub main_category: Option<String>,
    pub sub_category: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub ratings: Option<String>,
    pub no_of_ratings: Option<String>,
    pub discount_price: Option<String>,
    pub actual_price: Option<String>,
    pub asin: Option<String>,
    pub description: Option<String>,
}

/// Processor that turns dataset rows into indexable products.
///
/// A cell that fails to parse becomes `None`; the row is always kept.
#[derive(Debug, Default)]
pub struct ProductProcessor;

impl ProductProcessor {
    /// Create a new product processor.
    pub fn new() -> Self {
        Self
    }

    /// Process a batch of rows.
    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    pub fn process_batch(&self, rows: Vec<ProductRow>) -> Vec<ProductRecord> {
        let records: Vec<ProductRecord> =
            rows.into_iter().map(|row| self.process_row(row)).collect();
        debug!(processed_count = records.len(), "Processed row batch");
        records
    }

    /// Process a single row.
    pub fn process_row(&self, row: ProductRow) -> ProductRecord {
        ProductRecord {
            name: clean_text(row.name),
            main_category: clean_text(row.main_category),
            sub_category: clean_text(row.sub_category),
            image: clean_text(row.image),
            link: clean_text(row.link),
            ratings: row.ratings.as_deref().and_then(parse_decimal),
            no_of_ratings: row.no_of_ratings.as_deref().and_then(parse_count),
            discount_price: row.discount_price.as_deref().and_then(parse_decimal),
            actual_price: row.actual_price.as_deref().and_then(parse_decimal),
            asin: clean_text(row.asin),
            description: clean_text(row.description),
        }
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a decimal from dataset text.
///
/// Leading currency symbols and thousands separators are dropped
/// (`"₹1,099"` is `1099.0`). Anything else that does not parse, including
/// `nan` and infinities, is `None`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'))
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let value: f64 = cleaned.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a non-negative whole count from dataset text.
///
/// Integral floats such as `"12.0"` are accepted, as exported by tools
/// that store counts in float columns.
pub fn parse_count(raw: &str) -> Option<u64> {
    let value = parse_decimal(raw)?;
    if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return None;
    }
    Some(value as u64)
}
