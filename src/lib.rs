//! ttl_cache - A concurrency-safe in-memory cache
//!
//! Provides a capacity-bounded store with LRU eviction, idle-timeout TTLs,
//! live statistics and a background reaper, plus an optional HTTP front-end.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, CacheStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_reaper;
