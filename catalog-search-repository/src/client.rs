//! Catalog client implementation.
//!
//! This module provides the main client for querying the product catalog.
//! Application code uses it to search, look up single products, and fetch
//! similar products. It validates input, builds engine requests, and maps
//! engine responses into the catalog's response types.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::CatalogConfig;
use crate::errors::CatalogError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::queries::{build_more_like_this_query, build_search_requests, validate_limit};
use crate::opensearch::responses::{parse_aggregations, parse_document, parse_hits, parse_total};
use catalog_search_shared::{ProductHit, Recommendations, SearchPage, SearchParams};

/// The main client for querying the product catalog.
///
/// Stateless apart from its configuration; share it behind an `Arc`.
pub struct CatalogClient {
    engine: Arc<dyn SearchEngineClient>,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new CatalogClient with default configuration.
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self {
            engine,
            config: CatalogConfig::default(),
        }
    }

    /// Create a new CatalogClient with custom configuration.
    pub fn with_config(engine: Arc<dyn SearchEngineClient>, config: CatalogConfig) -> Self {
        Self { engine, config }
    }

    /// The underlying engine client.
    pub fn engine(&self) -> &Arc<dyn SearchEngineClient> {
        &self.engine
    }

    /// Search the catalog.
    ///
    /// Issues two requests concurrently: the filtered page of hits and the
    /// unfiltered facet counts.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchPage)` - One page of results with facets
    /// * `Err(CatalogError::Validation)` - Before any engine call, for bad input
    /// * `Err(CatalogError::Upstream)` - If either engine request fails
    #[instrument(
        skip(self, params),
        fields(q = ?params.q, page = params.page, limit = params.limit)
    )]
    pub async fn search(&self, params: &SearchParams) -> Result<SearchPage, CatalogError> {
        let requests = build_search_requests(params, self.config.max_page_size)?;
        debug!(
            hits = %requests.hits,
            aggregations = %requests.aggregations,
            "Built search requests"
        );

        let (hits_response, aggs_response) = tokio::try_join!(
            self.engine.search(&requests.hits),
            self.engine.search(&requests.aggregations)
        )?;

        let results = parse_hits(&hits_response)?;
        let total = parse_total(&hits_response);
        let aggregations = parse_aggregations(&aggs_response)?;

        info!(total = total, returned = results.len(), "Search completed");

        Ok(SearchPage {
            results,
            total,
            page: requests.page,
            limit: requests.limit,
            total_pages: SearchPage::page_count(total, requests.limit),
            aggregations,
        })
    }

    /// Look up a single product by its engine-assigned id.
    ///
    /// # Returns
    ///
    /// * `Ok(ProductHit)` - The product with its id injected
    /// * `Err(CatalogError::NotFound)` - If no product has this id
    /// * `Err(CatalogError::Upstream)` - On any other engine failure
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<ProductHit, CatalogError> {
        if id.trim().is_empty() {
            return Err(CatalogError::validation("Product id is required."));
        }

        let document = self.engine.get_document(id).await?;
        Ok(parse_document(id, &document)?)
    }

    /// Find products similar to the given one.
    ///
    /// Similarity is computed by the engine's `more_like_this` query over the
    /// source product's text fields. The source product never appears in the
    /// result, which holds at most `limit` items.
    ///
    /// # Returns
    ///
    /// * `Ok(Recommendations)` - Similar products, best match first
    /// * `Err(CatalogError::NotFound)` - If the source product does not exist
    /// * `Err(CatalogError::Validation)` - If `limit` is below 1
    #[instrument(skip(self))]
    pub async fn get_recommendations(
        &self,
        id: &str,
        limit: Option<i64>,
    ) -> Result<Recommendations, CatalogError> {
        let limit = validate_limit(
            limit.unwrap_or(i64::from(self.config.default_recommendations)),
            self.config.max_page_size,
        )?;

        let source = self.get_by_id(id).await?;
        if source.product.similarity_text().is_empty() {
            debug!(id = %id, "Product has no text to compare, no recommendations");
            return Ok(Recommendations::new(Vec::new()));
        }

        let query = build_more_like_this_query(&source, limit.saturating_add(1));
        let response = self.engine.search(&query).await?;

        let results: Vec<ProductHit> = parse_hits(&response)?
            .into_iter()
            .filter(|hit| hit.id != source.id)
            .take(limit as usize)
            .collect();

        debug!(id = %id, count = results.len(), "Recommendations found");
        Ok(Recommendations::new(results))
    }
}
