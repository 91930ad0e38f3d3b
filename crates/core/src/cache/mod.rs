//! Time-to-live cache for remote reads.
//!
//! One instance is created at startup and shared by `Arc`. Entries expire
//! lazily: an expired entry is dropped by the `get` that finds it, there is
//! no sweeper task. Time is read from `tokio::time::Instant` so tests running
//! on a paused runtime control expiry exactly; the `_at` variants take an
//! explicit instant instead.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

struct CacheEntry {
    value: Box<dyn Any + Send + Sync>,
    expires_at: Instant,
}

/// Key/value store with per-entry expiry and prefix invalidation
#[derive(Default)]
pub struct TtlCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache ready to be handed to several readers
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // A panic while holding the lock cannot leave the map half-written,
    // so a poisoned lock is still safe to use.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `value` under `key` until `ttl` from now, replacing any previous entry
    pub fn set<T>(&self, key: impl Into<String>, value: T, ttl: Duration)
    where
        T: Any + Send + Sync,
    {
        self.set_at(key, value, ttl, Instant::now());
    }

    /// Same as [`TtlCache::set`] with an explicit "now"
    pub fn set_at<T>(&self, key: impl Into<String>, value: T, ttl: Duration, now: Instant)
    where
        T: Any + Send + Sync,
    {
        let key = key.into();
        trace!(%key, ttl_ms = ttl.as_millis() as u64, "cache set");
        self.entries().insert(
            key,
            CacheEntry {
                value: Box::new(value),
                expires_at: now + ttl,
            },
        );
    }

    /// Returns the live value for `key`, or `None` if absent, expired, or stored
    /// under a different type
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        self.get_at(key, Instant::now())
    }

    /// Same as [`TtlCache::get`] with an explicit "now".
    ///
    /// An entry whose expiry equals `now` is already expired.
    pub fn get_at<T>(&self, key: &str, now: Instant) -> Option<T>
    where
        T: Any + Clone,
    {
        let mut entries = self.entries();
        let expired = now >= entries.get(key)?.expires_at;
        if expired {
            entries.remove(key);
            trace!(%key, "cache entry expired");
            return None;
        }

        entries
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>())
            .cloned()
    }

    /// Removes `key` if present
    pub fn del(&self, key: &str) {
        self.entries().remove(key);
    }

    /// Removes every key that starts with `prefix`
    pub fn bust(&self, prefix: &str) {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        debug!(prefix, removed = before - entries.len(), "cache bust");
    }

    /// Removes all entries
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of stored entries, expired ones included until they are touched
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").field("len", &self.len()).finish()
    }
}
