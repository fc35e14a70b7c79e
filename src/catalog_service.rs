//! Keeps a TTL-bound snapshot of the catalog index built from the backing database.

use crate::cache::ResourceCache;
use crate::catalog::{CatalogError, CatalogIndex};
use crate::source::{read_table, validate_sqlite_signature, DatabaseFetcher, FetchError, ReadError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Failed to fetch catalog database: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to read catalog database: {0}")]
    Read(#[from] ReadError),

    #[error("Catalog table has an unexpected shape: {0}")]
    Schema(#[from] CatalogError),

    #[error("Catalog refresh task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub source: String,
    pub table: String,
    pub ttl: Duration,
    pub fetch_timeout: Duration,
}

pub struct CatalogService {
    fetcher: Arc<dyn DatabaseFetcher>,
    settings: RefreshSettings,
    snapshots: ResourceCache<Arc<CatalogIndex>>,
}

impl CatalogService {
    pub fn new(fetcher: Arc<dyn DatabaseFetcher>, settings: RefreshSettings) -> Self {
        Self {
            fetcher,
            settings,
            snapshots: ResourceCache::new(),
        }
    }

    /// Current catalog snapshot, refreshed from the source once older than the TTL.
    ///
    /// Callers that arrive while a refresh is running share its result. A failed
    /// refresh keeps nothing, so the next call retries.
    pub async fn snapshot(&self) -> Result<Arc<CatalogIndex>, RefreshError> {
        self.snapshots
            .get_or_fetch(&self.settings.source, self.settings.ttl, || self.refresh())
            .await
    }

    /// Force the next `snapshot` call to reload from the source.
    pub fn invalidate(&self) {
        self.snapshots.invalidate(&self.settings.source);
    }

    async fn refresh(&self) -> Result<Arc<CatalogIndex>, RefreshError> {
        let started = Instant::now();
        let source = &self.settings.source;
        info!("Refreshing catalog from {}", source);

        let bytes = self
            .fetcher
            .fetch(source, self.settings.fetch_timeout)
            .await?;
        validate_sqlite_signature(&bytes, source)?;
        debug!("Fetched {} bytes in {:?}", bytes.len(), started.elapsed());

        let table = self.settings.table.clone();
        let raw = tokio::task::spawn_blocking(move || read_table(&bytes, &table)).await??;
        let index = CatalogIndex::build(&raw)?;

        info!(
            "Catalog refreshed: {} records in {:?}",
            index.len(),
            started.elapsed()
        );
        Ok(Arc::new(index))
    }
}
