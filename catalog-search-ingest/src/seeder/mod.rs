//! Seeder module for the catalog ingest.
//!
//! Coordinates the dataset reader and the bulk loader to (re)build the
//! product index.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::dataset::{load_records, DatasetSource};
use crate::errors::IngestError;
use crate::loader::{BulkLoader, LoadSummary};
use catalog_search_repository::opensearch::get_index_settings;
use catalog_search_repository::SearchEngineClient;

/// What `ensure_seeded` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The index already held documents and was left alone.
    Skipped { existing: u64 },
    /// The index was rebuilt from the dataset.
    Seeded(LoadSummary),
}

/// Seeder that populates the product index from the seed dataset.
///
/// All index-mutating operations share one gate, so concurrent callers
/// never interleave a reset with a load.
pub struct CatalogSeeder {
    client: Arc<dyn SearchEngineClient>,
    loader: BulkLoader,
    source: DatasetSource,
    gate: Mutex<()>,
}

impl CatalogSeeder {
    /// Create a new seeder with the default loader.
    pub fn new(client: Arc<dyn SearchEngineClient>, source: DatasetSource) -> Self {
        let loader = BulkLoader::new(client.clone());
        Self::with_loader(client, loader, source)
    }

    /// Create a new seeder with a custom loader.
    pub fn with_loader(
        client: Arc<dyn SearchEngineClient>,
        loader: BulkLoader,
        source: DatasetSource,
    ) -> Self {
        Self {
            client,
            loader,
            source,
            gate: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Drop the product index if present and recreate it with the catalog mapping.
    #[instrument(skip(self))]
    pub async fn reset_index(&self) -> Result<(), IngestError> {
        let _guard = self.gate.lock().await;
        self.recreate_index().await
    }

    /// Seed the index unless it already holds documents.
    ///
    /// A populated index is never written to. A missing index counts as
    /// empty.
    #[instrument(skip(self), fields(source = %self.source.path().display()))]
    pub async fn ensure_seeded(&self) -> Result<SeedOutcome, IngestError> {
        let _guard = self.gate.lock().await;

        let existing = self.client.count().await?;
        if existing > 0 {
            info!(existing = existing, "Product index already populated, skipping seed");
            return Ok(SeedOutcome::Skipped { existing });
        }

        info!("Product index empty, seeding");
        let summary = self.seed_locked().await?;
        Ok(SeedOutcome::Seeded(summary))
    }

    /// Rebuild the index from the dataset regardless of its contents.
    #[instrument(skip(self), fields(source = %self.source.path().display()))]
    pub async fn reseed(&self) -> Result<LoadSummary, IngestError> {
        let _guard = self.gate.lock().await;
        self.seed_locked().await
    }

    async fn recreate_index(&self) -> Result<(), IngestError> {
        if self.client.index_exists().await? {
            self.client.delete_index().await?;
        }
        self.client.create_index(&get_index_settings()).await?;
        info!("Product index recreated");
        Ok(())
    }

    // Callers hold the gate. The dataset is read before the index is
    // touched so an unreadable dataset leaves the current index intact.
    async fn seed_locked(&self) -> Result<LoadSummary, IngestError> {
        let records = load_records(&self.source).await?;

        self.recreate_index().await?;
        let summary = self.loader.bulk_load(&records).await;
        self.client.refresh().await?;

        if summary.failed > 0 {
            warn!(
                failed = summary.failed,
                indexed = summary.indexed,
                "Seed completed with failures"
            );
        } else {
            info!(indexed = summary.indexed, "Seed completed");
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_search_repository::{BulkStats, CatalogClient, SearchError};
    use catalog_search_shared::ProductRecord;
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    const CSV: &str = concat!(
        "name,main_category,sub_category,ratings,no_of_ratings,discount_price,actual_price\n",
        "Amazon Basics Tripod,tv audio & cameras,Cameras,4.3,812,₹599,₹1500\n",
        "Fire-Boltt Ninja Call Pro,tv audio & cameras,Smart Watches,4.0,",
        "\"13,254\",\"₹1,299\",\"₹9,999\"\n",
        "Milton Thermosteel Flask,home & kitchen,Kitchen Storage,4.4,955,₹749,₹1025\n",
    );

    /// Mock engine that keeps a document count and records index writes.
    #[derive(Default)]
    struct MockSearchClient {
        documents: AtomicU64,
        exists: std::sync::Mutex<bool>,
        deletes: AtomicUsize,
        creates: AtomicUsize,
        bulk_calls: AtomicUsize,
        refreshes: AtomicUsize,
        stored: std::sync::Mutex<Vec<ProductRecord>>,
    }

    impl MockSearchClient {
        fn with_documents(count: u64) -> Self {
            let client = Self::default();
            client.documents.store(count, Ordering::SeqCst);
            *client.exists.lock().unwrap() = true;
            client
        }

        fn writes(&self) -> usize {
            self.deletes.load(Ordering::SeqCst)
                + self.creates.load(Ordering::SeqCst)
                + self.bulk_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchEngineClient for MockSearchClient {
        async fn search(&self, _body: &Value) -> Result<Value, SearchError> {
            Ok(json!({}))
        }

        async fn get_document(&self, id: &str) -> Result<Value, SearchError> {
            let stored = self.stored.lock().unwrap();
            id.parse::<usize>()
                .ok()
                .and_then(|i| stored.get(i))
                .map(|doc| json!({ "_id": id, "found": true, "_source": doc }))
                .ok_or_else(|| SearchError::not_found(id))
        }

        async fn count(&self) -> Result<u64, SearchError> {
            Ok(self.documents.load(Ordering::SeqCst))
        }

        async fn index_exists(&self) -> Result<bool, SearchError> {
            Ok(*self.exists.lock().unwrap())
        }

        async fn delete_index(&self) -> Result<(), SearchError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.documents.store(0, Ordering::SeqCst);
            *self.exists.lock().unwrap() = false;
            Ok(())
        }

        async fn create_index(&self, settings: &Value) -> Result<(), SearchError> {
            assert!(settings.pointer("/mappings/properties/name").is_some());
            self.creates.fetch_add(1, Ordering::SeqCst);
            *self.exists.lock().unwrap() = true;
            Ok(())
        }

        async fn bulk_index(&self, documents: &[ProductRecord]) -> Result<BulkStats, SearchError> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            self.stored.lock().unwrap().extend_from_slice(documents);
            self.documents.fetch_add(documents.len() as u64, Ordering::SeqCst);
            Ok(BulkStats::new(documents.len(), 0))
        }

        async fn refresh(&self) -> Result<(), SearchError> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(true)
        }
    }

    fn csv_source(dir: &Path) -> DatasetSource {
        let path = dir.join("products.csv");
        std::fs::write(&path, CSV).unwrap();
        DatasetSource::from_path(path)
    }

    #[tokio::test]
    async fn test_populated_index_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSearchClient::with_documents(42));
        let seeder = CatalogSeeder::new(client.clone(), csv_source(dir.path()));

        let outcome = seeder.ensure_seeded().await.unwrap();

        assert_eq!(outcome, SeedOutcome::Skipped { existing: 42 });
        assert_eq!(client.writes(), 0);
    }

    #[tokio::test]
    async fn test_empty_index_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSearchClient::default());
        let seeder = CatalogSeeder::new(client.clone(), csv_source(dir.path()));

        let outcome = seeder.ensure_seeded().await.unwrap();

        let SeedOutcome::Seeded(summary) = outcome else {
            panic!("expected a seed, got {:?}", outcome);
        };
        assert_eq!(summary.total, 3);
        assert_eq!(summary.indexed, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(client.deletes.load(Ordering::SeqCst), 0);
        assert_eq!(client.creates.load(Ordering::SeqCst), 1);
        assert_eq!(client.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_seeded_record_reads_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSearchClient::default());
        let seeder = CatalogSeeder::new(client.clone(), csv_source(dir.path()));
        seeder.ensure_seeded().await.unwrap();

        let catalog = CatalogClient::new(client.clone());
        let hit = catalog.get_by_id("1").await.unwrap();

        assert_eq!(hit.id, "1");
        assert_eq!(hit.product.name.as_deref(), Some("Fire-Boltt Ninja Call Pro"));
        assert_eq!(hit.product.sub_category.as_deref(), Some("Smart Watches"));
        assert_eq!(hit.product.ratings, Some(4.0));
        assert_eq!(hit.product.no_of_ratings, Some(13254));
        assert_eq!(hit.product.discount_price, Some(1299.0));
        assert_eq!(hit.product.actual_price, Some(9999.0));
        assert_eq!(hit.product, client.stored.lock().unwrap()[1]);
    }

    #[tokio::test]
    async fn test_second_seed_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSearchClient::default());
        let seeder = CatalogSeeder::new(client.clone(), csv_source(dir.path()));

        seeder.ensure_seeded().await.unwrap();
        let outcome = seeder.ensure_seeded().await.unwrap();

        assert_eq!(outcome, SeedOutcome::Skipped { existing: 3 });
        assert_eq!(client.bulk_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_seeds_load_once() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSearchClient::default());
        let seeder = Arc::new(CatalogSeeder::new(client.clone(), csv_source(dir.path())));

        let (a, b) = tokio::join!(seeder.ensure_seeded(), seeder.ensure_seeded());

        let seeded = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|o| matches!(o, SeedOutcome::Seeded(_)))
            .count();
        assert_eq!(seeded, 1);
        assert_eq!(client.bulk_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reseed_replaces_index() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSearchClient::with_documents(10));
        let seeder = CatalogSeeder::new(client.clone(), csv_source(dir.path()));

        let summary = seeder.reseed().await.unwrap();

        assert_eq!(summary.indexed, 3);
        assert_eq!(client.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(client.documents.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_missing_dataset_leaves_index_alone() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSearchClient::with_documents(10));
        let seeder = CatalogSeeder::new(
            client.clone(),
            DatasetSource::from_path(dir.path().join("seed_data.zip")),
        );

        let result = seeder.reseed().await;

        assert!(matches!(result, Err(IngestError::DataSourceError(_))));
        assert_eq!(client.writes(), 0);
        assert_eq!(client.documents.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_reset_index() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSearchClient::with_documents(5));
        let seeder = CatalogSeeder::new(client.clone(), csv_source(dir.path()));

        seeder.reset_index().await.unwrap();

        assert_eq!(client.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(client.creates.load(Ordering::SeqCst), 1);
        assert_eq!(client.documents.load(Ordering::SeqCst), 0);
    }
}
