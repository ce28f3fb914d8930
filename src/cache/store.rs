//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheStats, LruTracker, StatsCounter};
use crate::error::{CacheError, Result};

// == Store Inner ==
/// Entry map and recency index, always mutated together under one lock.
#[derive(Debug)]
struct StoreInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
}

impl<V> StoreInner<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
        }
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.lru.remove(key);
        }
        removed
    }
}

// == Cache Store ==
/// Thread-safe cache with LRU eviction and idle-timeout TTLs.
///
/// Share it between threads or tasks with an `Arc`. All methods take
/// `&self`; the entry map and LRU index sit behind a single `RwLock`, while
/// statistics are kept in atomics outside of it.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage and access order
    inner: RwLock<StoreInner<V>>,
    /// Performance statistics
    stats: StatsCounter,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries stored without an explicit one
    default_ttl: Duration,
    /// Period between background sweeps
    reap_interval: Duration,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `default_ttl` - TTL for entries stored with [`CacheStore::set`]
    /// * `reap_interval` - Period used by the background reaper
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if any argument is zero.
    pub fn new(capacity: usize, default_ttl: Duration, reap_interval: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default TTL must be greater than zero".to_string(),
            ));
        }
        if reap_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "reap interval must be greater than zero".to_string(),
            ));
        }

        info!(
            capacity,
            default_ttl = ?default_ttl,
            reap_interval = ?reap_interval,
            "Cache store created"
        );

        Ok(Self {
            inner: RwLock::new(StoreInner::new()),
            stats: StatsCounter::new(),
            capacity,
            default_ttl,
            reap_interval,
        })
    }

    // == Set ==
    /// Stores a value under `key` with the default TTL.
    ///
    /// Overwrites any existing entry and resets its idle clock. If `key` is
    /// new and the cache is full, the least recently used entry is evicted
    /// first.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.insert(key.into(), value, self.default_ttl);
    }

    // == Set With TTL ==
    /// Stores a value under `key` with a TTL for this entry only.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.insert(key.into(), value, ttl);
    }

    fn insert(&self, key: String, value: V, ttl: Duration) {
        let mut guard = self.inner.write();
        let now = Instant::now();
        let inner = &mut *guard;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            if let Some(evicted) = inner.lru.evict_oldest() {
                inner.entries.remove(&evicted);
                self.stats.record_eviction(1);
                debug!(key = %evicted, "Evicted least recently used entry");
            }
        }

        inner.lru.touch(&key);
        inner
            .entries
            .insert(key, CacheEntry::with_access_time(value, ttl, now));
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns true if an entry was removed; deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.write().remove(key).is_some()
    }

    // == Clear ==
    /// Drops every entry at once. Statistics are left untouched.
    pub fn clear(&self) {
        let dropped = {
            let mut guard = self.inner.write();
            let inner = &mut *guard;
            let dropped = inner.entries.len();
            inner.entries = HashMap::new();
            inner.lru.clear();
            dropped
        };
        debug!(dropped, "Cache cleared");
    }

    // == Clear Expired ==
    /// Removes every entry whose TTL has elapsed since its last access.
    ///
    /// Each removal counts as an eviction. Returns the number of entries removed.
    pub fn clear_expired(&self) -> usize {
        let removed = {
            let mut guard = self.inner.write();
            let now = Instant::now();
            let StoreInner { entries, lru } = &mut *guard;
            let before = entries.len();
            entries.retain(|key, entry| {
                let keep = !entry.is_expired_at(now);
                if !keep {
                    lru.remove(key);
                }
                keep
            });
            before - entries.len()
        };

        self.stats.record_eviction(removed as u64);
        if removed > 0 {
            debug!(removed, "Expired entries swept");
        }
        removed
    }

    // == Contains Key ==
    /// Returns true if `key` holds a fresh entry.
    ///
    /// Unlike [`CacheStore::get`] this neither refreshes the entry nor
    /// touches the statistics.
    pub fn contains_key(&self, key: &str) -> bool {
        let inner = self.inner.read();
        let now = Instant::now();
        inner
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    // == Snapshot ==
    /// Returns current cache statistics, with `size` read at call time.
    pub fn snapshot(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the number of stored entries, including any not yet swept
    /// after expiring.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn reap_interval(&self) -> Duration {
        self.reap_interval
    }
}

impl<V: Clone> CacheStore<V> {
    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit resets the entry's idle clock and marks it most recently used.
    /// An expired entry is removed on discovery, counted as an eviction, and
    /// reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.write();
        let now = Instant::now();
        let inner = &mut *guard;

        let expired = match inner.entries.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                entry.touch(now);
                let value = entry.value.clone();
                inner.lru.touch(key);
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.remove(key);
            self.stats.record_eviction(1);
            debug!(key, "Removed expired entry on read");
        }

        self.stats.record_miss();
        None
    }
}
