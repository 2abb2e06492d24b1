//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client. The same wire format is understood by
//! Elasticsearch 7.x clusters.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    http::StatusCode,
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesRefreshParts},
    BulkParts, CountParts, GetParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::responses::{parse_bulk_response, parse_total};
use crate::types::BulkStats;
use catalog_search_shared::ProductRecord;

/// OpenSearch client implementation.
///
/// Bound to a single product index.
///
/// # Example
///
/// ```ignore
/// let config = EngineConfig::new("http://localhost:9200", "products");
/// let client = OpenSearchClient::new(&config)?;
///
/// let response = client.search(&json!({ "query": { "match_all": {} } })).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index: String,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client from connection settings.
    ///
    /// Credentials embedded in the URL are moved to basic auth and removed
    /// from the URL, so they never appear in transport errors or logs.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub fn new(config: &EngineConfig) -> Result<Self, SearchError> {
        let (url, credentials) = split_credentials(
            &config.url,
            config.username.as_deref(),
            config.password.as_deref(),
        )?;

        let conn_pool = SingleNodeConnectionPool::new(url.clone());
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(config.timeout);
        if let Some((username, password)) = credentials {
            builder = builder.auth(Credentials::Basic(username, password));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(
            url = %url,
            index = %config.index,
            timeout_secs = config.timeout.as_secs(),
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
            index: config.index.clone(),
        })
    }

    /// Name of the index this client reads and writes.
    pub fn index(&self) -> &str {
        &self.index
    }
}

/// Separate basic-auth credentials from an engine URL.
///
/// Explicit credentials win over ones embedded in the URL.
fn split_credentials(
    raw_url: &str,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<(Url, Option<(String, String)>), SearchError> {
    let mut url = Url::parse(raw_url)
        .map_err(|e| SearchError::connection(format!("Invalid engine URL: {}", e)))?;

    let embedded = if url.username().is_empty() {
        None
    } else {
        Some((
            url.username().to_string(),
            url.password().unwrap_or_default().to_string(),
        ))
    };
    // Only fails for cannot-be-a-base URLs, which have no credentials to strip.
    let _ = url.set_username("");
    let _ = url.set_password(None);

    let credentials = match username {
        Some(user) => Some((user.to_string(), password.unwrap_or_default().to_string())),
        None => embedded,
    };

    Ok((url, credentials))
}

async fn error_body(response: opensearch::http::response::Response) -> String {
    response.text().await.unwrap_or_default()
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    #[instrument(skip(self, body), fields(index = %self.index))]
    async fn search(&self, body: &Value) -> Result<Value, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index]))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = error_body(response).await;
            error!(status = %status, body = %body, "Search request failed");
            return Err(SearchError::query(format!(
                "Search failed with status {}: {}",
                status, body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn get_document(&self, id: &str) -> Result<Value, SearchError> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index, id))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            debug!(id = %id, "Document not found");
            return Err(SearchError::not_found(id));
        }
        if !status.is_success() {
            let body = error_body(response).await;
            error!(status = %status, body = %body, "Get request failed");
            return Err(SearchError::query(format!(
                "Get failed with status {}: {}",
                status, body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }

    async fn count(&self) -> Result<u64, SearchError> {
        let response = self
            .client
            .count(CountParts::Index(&[&self.index]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(SearchError::query(format!(
                "Count failed with status {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchError::parse("Count response has no count"))
    }

    async fn index_exists(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&self.index]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn delete_index(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[&self.index]))
            .send()
            .await
            .map_err(|e| SearchError::index_deletion(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - index may not exist
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = error_body(response).await;
            error!(status = %status, body = %body, "Index deletion failed");
            return Err(SearchError::index_deletion(format!(
                "Delete failed with status {}: {}",
                status, body
            )));
        }

        info!("Deleted index");
        Ok(())
    }

    #[instrument(skip(self, settings), fields(index = %self.index))]
    async fn create_index(&self, settings: &Value) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(settings.clone())
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            info!("Created index");
            return Ok(());
        }

        let body = error_body(response).await;
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            warn!("Index already exists, keeping it");
            return Ok(());
        }

        error!(status = %status, body = %body, "Index creation failed");
        Err(SearchError::index_creation(format!(
            "Create failed with status {}: {}",
            status, body
        )))
    }

    #[instrument(skip(self, documents), fields(index = %self.index, count = documents.len()))]
    async fn bulk_index(&self, documents: &[ProductRecord]) -> Result<BulkStats, SearchError> {
        if documents.is_empty() {
            return Ok(BulkStats::default());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for doc in documents {
            let source = serde_json::to_value(doc).map_err(|e| {
                SearchError::bulk_index(format!("Failed to serialize product: {}", e))
            })?;
            body.push(json!({ "index": {} }).into());
            body.push(source.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = error_body(response).await;
            error!(status = %status, body = %body, "Bulk request failed");
            return Err(SearchError::bulk_index(format!(
                "Bulk failed with status {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let stats = parse_bulk_response(&body, documents.len());
        if stats.failed > 0 {
            warn!(failed = stats.failed, succeeded = stats.succeeded, "Bulk request had failures");
        } else {
            debug!(succeeded = stats.succeeded, "Bulk request completed");
        }

        Ok(stats)
    }

    async fn refresh(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[&self.index]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(SearchError::query(format!(
                "Refresh failed with status {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let health: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;
        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        debug!(status = %status, "Cluster health");
        Ok(status == "green" || status == "yellow")
    }
}
