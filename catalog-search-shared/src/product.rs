//! Product document stored in the catalog index.

use serde::{Deserialize, Serialize};

/// A single product as stored in the search index.
///
/// Numeric fields are `None` when the source value could not be parsed;
/// the record is still indexed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title, analyzed as full text.
    pub name: Option<String>,
    /// Top-level category (keyword).
    pub main_category: Option<String>,
    /// Second-level category (keyword).
    pub sub_category: Option<String>,
    /// Image URI.
    pub image: Option<String>,
    /// Link to the marketplace listing.
    pub link: Option<String>,
    /// Average rating, 0-5.
    pub ratings: Option<f64>,
    /// Number of ratings.
    pub no_of_ratings: Option<u64>,
    /// Price after discount.
    pub discount_price: Option<f64>,
    /// List price.
    pub actual_price: Option<f64>,
    /// Marketplace SKU.
    pub asin: Option<String>,
    /// Free-text description, only present when the dataset carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductRecord {
    /// Create a record with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Text values used to seed a similarity query, in field order.
    pub fn similarity_text(&self) -> Vec<&str> {
        [
            self.name.as_deref(),
            self.description.as_deref(),
            self.main_category.as_deref(),
            self.sub_category.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect()
    }
}

/// A product returned from the index together with its engine-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductHit {
    #[serde(flatten)]
    pub product: ProductRecord,
    /// Internal document id assigned by the search engine.
    pub id: String,
}

impl ProductHit {
    pub fn new(id: impl Into<String>, product: ProductRecord) -> Self {
        Self {
            product,
            id: id.into(),
        }
    }
}
