//! TTL-keyed cache in front of expensive or remote fetches.
//!
//! Each key owns an async slot lock, so concurrent callers asking for the
//! same key wait for a single fetch instead of issuing their own.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct CachedValue<V> {
    value: V,
    fetched_at: Instant,
    ttl: Duration,
}

impl<V> CachedValue<V> {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.fetched_at) < ttl
    }
}

type Slot<V> = Arc<tokio::sync::Mutex<Option<CachedValue<V>>>>;

pub struct ResourceCache<V> {
    slots: Mutex<HashMap<String, Slot<V>>>,
}

impl<V> Default for ResourceCache<V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> ResourceCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &str) -> Slot<V> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(key.to_string()).or_default().clone()
    }

    /// Return the cached value for `key`, or run `fetch` when there is none
    /// younger than `ttl`.
    ///
    /// A failed fetch is handed back to the caller and leaves the slot as it
    /// was, so the next call tries again.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        let mut cached = slot.lock().await;

        if let Some(entry) = cached.as_ref() {
            if entry.is_fresh(ttl, Instant::now()) {
                debug!("Cache hit for {}", key);
                return Ok(entry.value.clone());
            }
        }

        debug!("Cache miss for {}, fetching", key);
        let value = fetch().await?;
        *cached = Some(CachedValue {
            value: value.clone(),
            fetched_at: Instant::now(),
            ttl,
        });
        Ok(value)
    }

    /// Drop the cached value for `key`, forcing the next call to fetch.
    pub fn invalidate(&self, key: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
    }

    /// Remove entries older than the TTL they were stored with.
    ///
    /// Slots with a fetch in flight are left alone.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let before = slots.len();
        slots.retain(|_, slot| match slot.try_lock() {
            Ok(cached) => match cached.as_ref() {
                Some(entry) => entry.is_fresh(entry.ttl, now),
                None => false,
            },
            Err(_) => true,
        });
        before - slots.len()
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
