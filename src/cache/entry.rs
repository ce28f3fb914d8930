//! Cache Entry Module
//!
//! Defines the record stored for each key: value, TTL and last access time.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry.
///
/// The TTL is measured from `last_access`, which is reset on creation and on
/// every successful read, so the TTL behaves as an idle timeout.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Idle time after which the entry is stale
    pub ttl: Duration,
    /// Creation time or time of the most recent successful read
    pub last_access: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry, stamped with the current time.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::with_access_time(value, ttl, Instant::now())
    }

    /// Creates a new entry with an explicit access time.
    pub fn with_access_time(value: V, ttl: Duration, last_access: Instant) -> Self {
        Self {
            value,
            ttl,
            last_access,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// Boundary condition: the entry expires only once strictly more than
    /// `ttl` has elapsed since the last access. An entry checked exactly at
    /// `last_access + ttl` is still fresh.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_access) > self.ttl
    }

    /// Checks whether the entry is stale right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Touch ==
    /// Resets the idle clock to `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_access = now;
    }
}
