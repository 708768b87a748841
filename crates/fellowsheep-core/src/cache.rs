//! Generic expiring cache.
//!
//! Values are stored behind an [`Arc`] so repeated reads within the TTL hand
//! out the same allocation. Freshness is measured from insertion time with
//! the tokio clock, which lets tests drive expiry with a paused runtime.

use mini_moka::sync::Cache;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::config::CacheConfig;

struct Stamped<V> {
    value: Arc<V>,
    inserted_at: Instant,
}

impl<V> Clone for Stamped<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            inserted_at: self.inserted_at,
        }
    }
}

/// Key → value cache whose entries are fresh for a fixed TTL after insertion.
pub struct TtlCache<K, V> {
    entries: Cache<K, Stamped<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + std::fmt::Debug + 'static,
    V: Send + Sync + 'static,
{
    /// Create a cache with the default capacity.
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, CacheConfig::MAX_ENTRIES)
    }

    /// Create a cache holding at most `max_entries` entries.
    pub fn with_capacity(ttl: Duration, max_entries: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(max_entries).build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a fresh value. Stale entries are dropped on the way out.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let stamped = self.entries.get(key)?;
        if self.is_fresh(&stamped) {
            debug!("Cache hit for {:?}", key);
            Some(stamped.value)
        } else {
            debug!("Cache entry for {:?} expired", key);
            self.entries.invalidate(key);
            None
        }
    }

    /// Store a value, replacing any previous entry for the key.
    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert(
            key,
            Stamped {
                value: value.clone(),
                inserted_at: Instant::now(),
            },
        );
        value
    }

    /// Return the cached value, or run `fetch` and cache its success.
    ///
    /// Failures are returned as-is and leave the cache untouched.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, fetch: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = fetch().await?;
        Ok(self.insert(key, value))
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.invalidate(key);
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Drop every entry older than the TTL and return how many were removed.
    pub fn clear_expired(&self) -> usize {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|entry| !self.is_fresh(entry.value()))
            .map(|entry| entry.key().clone())
            .collect();

        for key in &expired {
            self.entries.invalidate(key);
        }
        expired.len()
    }

    /// Number of fresh entries.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| self.is_fresh(entry.value()))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, stamped: &Stamped<V>) -> bool {
        stamped.inserted_at.elapsed() < self.ttl
    }
}
