use super::{FilmDetails, FilmLookup};
use crate::cache::ResourceCache;
use crate::source::FetchError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Lookup wrapper issuing at most one request per identity and TTL window.
///
/// Expired identities are dropped on each lookup, so the cache only holds
/// titles looked up within the last TTL.
pub struct CachedLookup {
    inner: Arc<dyn FilmLookup>,
    cache: ResourceCache<FilmDetails>,
    ttl: Duration,
}

impl CachedLookup {
    pub fn new(inner: Arc<dyn FilmLookup>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: ResourceCache::new(),
            ttl,
        }
    }
}

#[async_trait]
impl FilmLookup for CachedLookup {
    async fn lookup(&self, external_id: &str) -> Result<FilmDetails, FetchError> {
        let purged = self.cache.purge_expired();
        if purged > 0 {
            debug!("Dropped {} expired lookups", purged);
        }
        self.cache
            .get_or_fetch(external_id, self.ttl, || self.inner.lookup(external_id))
            .await
    }
}
