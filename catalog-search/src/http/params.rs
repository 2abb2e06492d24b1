//! Query string parsing.
//!
//! Handlers take the raw `(key, value)` pairs so repeated keys survive and
//! both `category` and `category[]` spellings are accepted.

use std::str::FromStr;

use catalog_search_shared::{SearchParams, SortOrder};

use super::error::ApiError;

/// Build search parameters from query string pairs.
///
/// Unknown keys are ignored. Empty numeric values count as absent;
/// malformed ones are rejected.
pub fn parse_search_params(pairs: &[(String, String)]) -> Result<SearchParams, ApiError> {
    let mut params = SearchParams::default();
    let mut sort = None;

    for (key, value) in pairs {
        match key.trim_end_matches("[]") {
            "q" => params.q = Some(value.clone()),
            "page" => {
                if let Some(page) = parse_number(key, value)? {
                    params.page = page;
                }
            }
            "limit" => {
                if let Some(limit) = parse_number(key, value)? {
                    params.limit = limit;
                }
            }
            "category" => push_term(&mut params.category, value),
            "subcategory" => push_term(&mut params.subcategory, value),
            "min_price" => params.min_price = parse_bound(key, value)?,
            "max_price" => params.max_price = parse_bound(key, value)?,
            "min_rating" => params.min_rating = parse_bound(key, value)?,
            "max_rating" => params.max_rating = parse_bound(key, value)?,
            "sort" => sort = Some(value.as_str()),
            _ => {}
        }
    }

    params.sort = SortOrder::from_param(sort);
    Ok(params)
}

/// Read the optional `limit` of a recommendation request.
pub fn parse_limit(pairs: &[(String, String)]) -> Result<Option<i64>, ApiError> {
    let mut limit = None;
    for (key, value) in pairs {
        if key == "limit" {
            limit = parse_number(key, value)?;
        }
    }
    Ok(limit)
}

fn push_term(terms: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        terms.push(value.to_string());
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<Option<T>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ApiError::BadRequest(format!("Invalid value for {}: {:?}", key, value)))
}

fn parse_bound(key: &str, value: &str) -> Result<Option<f64>, ApiError> {
    match parse_number::<f64>(key, value)? {
        Some(bound) if !bound.is_finite() => Err(ApiError::BadRequest(format!(
            "Invalid value for {}: {:?}",
            key, value
        ))),
        bound => Ok(bound),
    }
}
