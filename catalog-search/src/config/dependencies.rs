//! Dependency initialization and wiring for the catalog search service.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::ServiceError;
use catalog_search_ingest::{CatalogSeeder, DatasetSource};
use catalog_search_repository::config::redact_url;
use catalog_search_repository::{CatalogClient, CatalogConfig, OpenSearchClient, SearchEngineClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Query side of the catalog.
    pub catalog: Arc<CatalogClient>,
    /// Seeding and reset of the product index.
    pub seeder: Arc<CatalogSeeder>,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// Verifies the engine is reachable and healthy before returning.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError)` - If initialization fails
    pub async fn new(settings: &Settings) -> Result<Self, ServiceError> {
        info!(
            es_host = %redact_url(&settings.engine.url),
            index = %settings.engine.index,
            seed_data = %settings.seed_data_path.display(),
            "Initializing dependencies"
        );

        // Initialize OpenSearch client
        let search_client = OpenSearchClient::new(&settings.engine).map_err(|e| {
            ServiceError::config(format!("Failed to create OpenSearch client: {}", e))
        })?;

        // Verify OpenSearch is reachable
        let healthy = search_client
            .health_check()
            .await
            .map_err(|e| ServiceError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(ServiceError::config("OpenSearch cluster is unhealthy"));
        }

        info!(index = %search_client.index(), "OpenSearch connection verified");

        Ok(Self::with_engine(Arc::new(search_client), settings))
    }

    /// Wire the catalog services around an existing engine client.
    pub fn with_engine(engine: Arc<dyn SearchEngineClient>, settings: &Settings) -> Self {
        let catalog = CatalogClient::with_config(
            engine.clone(),
            CatalogConfig::with_max_page_size(settings.max_page_size),
        );
        let seeder = CatalogSeeder::new(
            engine,
            DatasetSource::from_path(settings.seed_data_path.clone()),
        );

        Self {
            catalog: Arc::new(catalog),
            seeder: Arc::new(seeder),
        }
    }
}
