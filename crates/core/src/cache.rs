//! TTL Cache Store
//!
//! Generic in-memory key/value store with a per-entry time-to-live, manual
//! invalidation, and hit/miss statistics. This is the foundation both cache
//! tiers (tool results, conversation responses) are built on.
//!
//! Uses `Mutex<HashMap>` for deterministic behavior and low cardinality;
//! expired entries are purged lazily on read and during `stats()`. A read at
//! or after the expiry deadline always behaves as a miss and evicts the stale
//! entry, so no stale value is ever observably returned.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Snapshot of cache health counters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of unexpired entries currently stored
    pub live_entries: usize,
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that returned nothing (absent or expired)
    pub misses: u64,
}

struct StoredEntry<T> {
    value: T,
    expires_at: Instant,
}

/// Key/value store with per-entry TTL.
///
/// Thread-safe: interior mutability via `Mutex`, designed to be wrapped in
/// `Arc` and shared across request tasks. Values are cloned out on read.
pub struct CacheStore<T: Clone> {
    entries: Mutex<HashMap<String, StoredEntry<T>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T: Clone> CacheStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Store a value under `key`, expiring `ttl` from now.
    ///
    /// Overwrites any existing entry for the same key, including its deadline.
    pub fn put(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let mut entries = self.lock_entries();
        entries.insert(
            key.into(),
            StoredEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Return the value for `key` if present and unexpired.
    ///
    /// An expired entry is evicted and counted as a miss.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.lock_entries();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Remove every entry. Hit/miss counters are preserved.
    pub fn invalidate_all(&self) {
        self.lock_entries().clear();
    }

    /// Current counters. Purges expired entries first so `live_entries`
    /// reflects only data a reader could still observe.
    pub fn stats(&self) -> CacheStats {
        let mut entries = self.lock_entries();
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        CacheStats {
            live_entries: entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredEntry<T>>> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the map itself is still structurally sound.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
