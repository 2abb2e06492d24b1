//! HTTP surface of the catalog search service.

pub mod error;
pub mod handlers;
pub mod params;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::Dependencies;
use catalog_search_ingest::CatalogSeeder;
use catalog_search_repository::CatalogClient;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub seeder: Arc<CatalogSeeder>,
}

impl From<&Dependencies> for AppState {
    fn from(deps: &Dependencies) -> Self {
        Self {
            catalog: deps.catalog.clone(),
            seeder: deps.seeder.clone(),
        }
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(handlers::search))
        .route("/product/:id", get(handlers::get_product))
        .route("/product/:id/recommendations", get(handlers::get_recommendations))
        .route("/reset", post(handlers::reset))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state)
}
