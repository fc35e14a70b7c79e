//! Backing-store fetch collaborators.

use super::error::FetchError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// First bytes of every SQLite 3 database file.
pub const SQLITE_SIGNATURE: &[u8] = b"SQLite format 3\0";

/// Fetches the raw bytes of the film database.
#[async_trait]
pub trait DatabaseFetcher: Send + Sync {
    /// Fetch `source`, giving up after `timeout`.
    async fn fetch(&self, source: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// Reject payloads that are not SQLite databases, e.g. an HTML error page
/// served with a success status.
pub fn validate_sqlite_signature(bytes: &[u8], origin: &str) -> Result<(), FetchError> {
    if bytes.starts_with(SQLITE_SIGNATURE) {
        Ok(())
    } else {
        Err(FetchError::InvalidSignature {
            origin: origin.to_string(),
        })
    }
}

/// HTTP(S) fetcher.
pub struct HttpDatabaseFetcher {
    client: reqwest::Client,
}

impl HttpDatabaseFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("film-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DatabaseFetcher for HttpDatabaseFetcher {
    async fn fetch(&self, source: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        debug!("Downloading catalog database from {}", source);
        let response = self
            .client
            .get(source)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(source, timeout, e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: source.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(source, timeout, e))?;
        debug!("Downloaded {} bytes from {}", bytes.len(), source);
        Ok(bytes.to_vec())
    }
}

/// Reads the database from the local filesystem.
#[derive(Default)]
pub struct LocalFileFetcher;

#[async_trait]
impl DatabaseFetcher for LocalFileFetcher {
    async fn fetch(&self, source: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let path = PathBuf::from(source);
        debug!("Reading catalog database from {:?}", path);
        match tokio::time::timeout(timeout, tokio::fs::read(&path)).await {
            Ok(read) => Ok(read?),
            Err(_) => Err(FetchError::Timeout {
                url: source.to_string(),
                timeout,
            }),
        }
    }
}

pub fn is_remote_source(source: &str) -> bool {
    let lower = source.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Pick the fetcher matching a configured source.
pub fn fetcher_for_source(source: &str) -> Result<Arc<dyn DatabaseFetcher>, FetchError> {
    if is_remote_source(source) {
        Ok(Arc::new(HttpDatabaseFetcher::new()?))
    } else {
        Ok(Arc::new(LocalFileFetcher))
    }
}
