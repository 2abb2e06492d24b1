//! Loader module for the catalog ingest.
//!
//! Bulk loads product records into the search index in fixed-size batches.

use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use catalog_search_repository::{BulkStats, SearchEngineClient};
use catalog_search_shared::ProductRecord;

/// Number of records sent per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents per bulk request.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Result of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records handed to the loader.
    pub total: usize,
    /// Records the engine accepted.
    pub indexed: usize,
    /// Records rejected by the engine, including whole failed batches.
    pub failed: usize,
    /// Bulk requests sent.
    pub batches: usize,
}

/// Loader that indexes product records into the search engine.
///
/// Batches are sent one after another. A failed batch is counted and
/// logged and the load carries on with the next one; nothing is retried.
pub struct BulkLoader {
    client: Arc<dyn SearchEngineClient>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new loader with the default batch size.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self::with_config(client, LoaderConfig::default())
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(client: Arc<dyn SearchEngineClient>, config: LoaderConfig) -> Self {
        let config = LoaderConfig {
            batch_size: config.batch_size.max(1),
        };
        Self { client, config }
    }

    /// Index all records.
    #[instrument(
        skip(self, records),
        fields(total = records.len(), batch_size = self.config.batch_size)
    )]
    pub async fn bulk_load(&self, records: &[ProductRecord]) -> LoadSummary {
        let mut stats = BulkStats::default();
        let mut batches = 0;

        for batch in records.chunks(self.config.batch_size) {
            batches += 1;
            match self.client.bulk_index(batch).await {
                Ok(batch_stats) => {
                    debug!(
                        batch = batches,
                        succeeded = batch_stats.succeeded,
                        failed = batch_stats.failed,
                        "Bulk batch completed"
                    );
                    stats += batch_stats;
                }
                Err(e) => {
                    error!(batch = batches, count = batch.len(), error = %e, "Bulk batch failed");
                    stats += BulkStats::all_failed(batch.len());
                }
            }
            info!("Indexed {}/{} products", stats.total(), records.len());
        }

        let summary = LoadSummary {
            total: records.len(),
            indexed: stats.succeeded,
            failed: stats.failed,
            batches,
        };
        info!(
            indexed = summary.indexed,
            failed = summary.failed,
            batches = summary.batches,
            "Bulk load completed"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_search_repository::SearchError;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Mock engine that records bulk batch sizes and fails chosen batches.
    struct MockSearchClient {
        batches: Mutex<Vec<usize>>,
        fail_batch: Option<usize>,
        reject_per_batch: usize,
    }

    impl MockSearchClient {
        fn new() -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                fail_batch: None,
                reject_per_batch: 0,
            }
        }

        fn batch_sizes(&self) -> Vec<usize> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchEngineClient for MockSearchClient {
        async fn search(&self, _body: &Value) -> Result<Value, SearchError> {
            Ok(json!({}))
        }

        async fn get_document(&self, id: &str) -> Result<Value, SearchError> {
            Err(SearchError::not_found(id))
        }

        async fn count(&self) -> Result<u64, SearchError> {
            Ok(0)
        }

        async fn index_exists(&self) -> Result<bool, SearchError> {
            Ok(true)
        }

        async fn delete_index(&self) -> Result<(), SearchError> {
            Ok(())
        }

        async fn create_index(&self, _settings: &Value) -> Result<(), SearchError> {
            Ok(())
        }

        async fn bulk_index(&self, documents: &[ProductRecord]) -> Result<BulkStats, SearchError> {
            let index = {
                let mut batches = self.batches.lock().unwrap();
                batches.push(documents.len());
                batches.len()
            };
            if self.fail_batch == Some(index) {
                return Err(SearchError::bulk_index("rejected"));
            }
            let rejected = self.reject_per_batch.min(documents.len());
            Ok(BulkStats::new(documents.len() - rejected, rejected))
        }

        async fn refresh(&self) -> Result<(), SearchError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(true)
        }
    }

    fn records(count: usize) -> Vec<ProductRecord> {
        (0..count)
            .map(|i| ProductRecord::named(format!("Product {}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_bulk_load_batches() {
        let client = Arc::new(MockSearchClient::new());
        let loader = BulkLoader::new(client.clone());

        let summary = loader.bulk_load(&records(25_001)).await;

        assert_eq!(client.batch_sizes(), vec![10_000, 10_000, 5_001]);
        assert_eq!(
            summary,
            LoadSummary {
                total: 25_001,
                indexed: 25_001,
                failed: 0,
                batches: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_batch_is_counted_and_load_continues() {
        let client = Arc::new(MockSearchClient {
            fail_batch: Some(2),
            ..MockSearchClient::new()
        });
        let loader = BulkLoader::with_config(client.clone(), LoaderConfig { batch_size: 4 });

        let summary = loader.bulk_load(&records(10)).await;

        assert_eq!(client.batch_sizes(), vec![4, 4, 2]);
        assert_eq!(summary.indexed, 6);
        assert_eq!(summary.failed, 4);
        assert_eq!(summary.batches, 3);
    }

    #[tokio::test]
    async fn test_item_rejections_are_counted() {
        let client = Arc::new(MockSearchClient {
            reject_per_batch: 1,
            ..MockSearchClient::new()
        });
        let loader = BulkLoader::with_config(client, LoaderConfig { batch_size: 5 });

        let summary = loader.bulk_load(&records(10)).await;

        assert_eq!(summary.indexed, 8);
        assert_eq!(summary.failed, 2);
    }

    #[tokio::test]
    async fn test_empty_load_sends_nothing() {
        let client = Arc::new(MockSearchClient::new());
        let loader = BulkLoader::new(client.clone());

        let summary = loader.bulk_load(&[]).await;

        assert!(client.batch_sizes().is_empty());
        assert_eq!(summary, LoadSummary::default());
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_clamped() {
        let client = Arc::new(MockSearchClient::new());
        let loader = BulkLoader::with_config(client.clone(), LoaderConfig { batch_size: 0 });

        loader.bulk_load(&records(2)).await;

        assert_eq!(client.batch_sizes(), vec![1, 1]);
    }
}
