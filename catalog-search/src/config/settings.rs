//! Service settings read from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use catalog_search_repository::config::DEFAULT_MAX_PAGE_SIZE;
use catalog_search_repository::opensearch::DEFAULT_INDEX_NAME;
use catalog_search_repository::EngineConfig;

use crate::ServiceError;

/// Default engine URL.
const DEFAULT_ES_HOST: &str = "http://localhost:9200";

/// Default engine request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Default location of the seed dataset.
const DEFAULT_SEED_DATA_PATH: &str = "data/seed_data.zip";

/// Default HTTP listen address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";

/// Largest accepted page size cap, the engine's default result window.
const MAX_PAGE_SIZE_LIMIT: u32 = 10_000;

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Everything the service needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: EngineConfig,
    pub seed_data_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub max_page_size: u32,
    pub log_format: LogFormat,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ES_HOST`: Engine URL (default: http://localhost:9200)
    /// - `ES_USERNAME` / `ES_PASSWORD`: Basic auth credentials (optional)
    /// - `ES_PRODUCTS_INDEX`: Product index name (default: products)
    /// - `ES_TIMEOUT_SECS`: Engine request timeout (default: 600)
    /// - `SEED_DATA_PATH`: Seed dataset, ZIP or CSV (default: data/seed_data.zip)
    /// - `BIND_ADDR`: HTTP listen address (default: 0.0.0.0:8081)
    /// - `MAX_PAGE_SIZE`: Page size cap (default: 100)
    /// - `LOG_FORMAT`: `text` or `json` (default: text)
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = var("ES_HOST").unwrap_or_else(|| DEFAULT_ES_HOST.to_string());
        let index = var("ES_PRODUCTS_INDEX").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string());
        let timeout_secs: u64 = parse_var(&var, "ES_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        let mut engine =
            EngineConfig::new(url, index).with_timeout(Duration::from_secs(timeout_secs));
        if let Some(username) = var("ES_USERNAME") {
            engine = engine.with_credentials(username, var("ES_PASSWORD").unwrap_or_default());
        }

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse().map_err(|e| {
            ServiceError::config(format!("Invalid BIND_ADDR {:?}: {}", bind_addr, e))
        })?;

        let max_page_size: u32 = parse_var(&var, "MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE)?;
        if !(1..=MAX_PAGE_SIZE_LIMIT).contains(&max_page_size) {
            return Err(ServiceError::config(format!(
                "MAX_PAGE_SIZE must be between 1 and {}",
                MAX_PAGE_SIZE_LIMIT
            )));
        }

        let log_format = match var("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ServiceError::config(format!(
                    "Invalid LOG_FORMAT {:?}, expected text or json",
                    other
                )))
            }
        };

        Ok(Self {
            engine,
            seed_data_path: var("SEED_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_SEED_DATA_PATH.to_string())
                .into(),
            bind_addr,
            max_page_size,
            log_format,
        })
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T, ServiceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ServiceError::config(format!("Invalid {} {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
