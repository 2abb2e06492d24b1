//! HTTP handlers for the catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use catalog_search_repository::SearchEngineClient;
use catalog_search_shared::{ProductHit, Recommendations, SearchPage};

use super::error::ApiError;
use super::params::{parse_limit, parse_search_params};
use super::AppState;

/// Body of a successful reset.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub indexed: usize,
    pub failed: usize,
}

/// Full-text product search with filters, facets and paging.
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchPage>, ApiError> {
    let params = parse_search_params(&pairs)?;
    let page = state.catalog.search(&params).await?;
    Ok(Json(page))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductHit>, ApiError> {
    let product = state.catalog.get_by_id(&id).await?;
    Ok(Json(product))
}

/// Products similar to the given one.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Recommendations>, ApiError> {
    let limit = parse_limit(&pairs)?;
    let recommendations = state.catalog.get_recommendations(&id, limit).await?;
    Ok(Json(recommendations))
}

/// Drop the product index and reload it from the seed dataset.
///
/// Waits for any seed or reset already in progress.
pub async fn reset(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    info!(source = %state.seeder.source().path().display(), "Index reset requested");
    let summary = state.seeder.reseed().await?;

    Ok(Json(ResetResponse {
        message: format!("Index reset and loaded {} products", summary.indexed),
        indexed: summary.indexed,
        failed: summary.failed,
    }))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    match state.catalog.engine().health_check().await {
        Ok(true) => Ok(Json(json!({ "status": "ok" }))),
        Ok(false) => Err(ApiError::Unavailable("Search engine cluster is unhealthy".to_string())),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            Err(ApiError::Unavailable(format!(
                "Search engine unreachable: {}",
                e
            )))
        }
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}
