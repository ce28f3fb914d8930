//! Behavioural scenarios for the cache store
//!
//! Capacity, LRU order, TTL expiry, read-refresh, statistics and
//! concurrent access, exercised through the public API.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread::{self, sleep};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use ttl_cache::{spawn_reaper, CacheStore};

const LONG_TTL: Duration = Duration::from_secs(300);
const REAP: Duration = Duration::from_secs(1);

fn store<V>(capacity: usize) -> CacheStore<V> {
    CacheStore::new(capacity, LONG_TTL, REAP).unwrap()
}

// == Capacity ==

#[test]
fn test_capacity_holds_after_every_insert() {
    let capacity = 10;
    let cache = store::<usize>(capacity);

    for i in 0..50 {
        cache.set(format!("key{i}"), i);
        assert_eq!(cache.len(), (i + 1).min(capacity));
    }

    assert_eq!(cache.snapshot().evictions, 40);
}

// == LRU ==

#[test]
fn test_refreshed_key_survives_eviction() {
    let capacity = 5;
    let cache = store::<usize>(capacity);

    for i in 0..capacity {
        cache.set(format!("key{i}"), i);
    }

    // Refresh key0, making key1 the least recently touched
    assert_eq!(cache.get("key0"), Some(0));

    cache.set("extra", 99);

    assert_eq!(cache.get("key0"), Some(0));
    assert_eq!(cache.get("key1"), None);
    for i in 2..capacity {
        assert_eq!(cache.get(&format!("key{i}")), Some(i));
    }
    assert_eq!(cache.get("extra"), Some(99));
}

#[test]
fn test_capacity_two_scenario() {
    let cache = store::<&str>(2);

    cache.set("a", "A");
    cache.set("b", "B");
    cache.set("c", "C");

    // "a" has the older last access
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some("B"));
    assert_eq!(cache.get("c"), Some("C"));
    assert_eq!(cache.snapshot().evictions, 1);
}

// == TTL ==

#[test]
fn test_unread_entry_expires() {
    let cache = store::<u32>(10);

    cache.set_with_ttl("k", 1, Duration::from_millis(50));
    sleep(Duration::from_millis(100));

    assert_eq!(cache.get("k"), None);
}

#[test]
fn test_per_entry_ttl_overrides_default() {
    let cache = CacheStore::new(10, Duration::from_millis(50), REAP).unwrap();

    cache.set("default", 1);
    cache.set_with_ttl("explicit", 2, LONG_TTL);
    sleep(Duration::from_millis(100));

    assert_eq!(cache.get("default"), None);
    assert_eq!(cache.get("explicit"), Some(2));
}

#[test]
fn test_read_refresh_keeps_entry_alive() {
    let ttl = Duration::from_millis(200);
    let cache = store::<u32>(10);

    cache.set_with_ttl("hot", 7, ttl);
    cache.set_with_ttl("cold", 8, ttl);

    // Reads every ttl/2 for several ttl periods
    for _ in 0..8 {
        sleep(ttl / 2);
        assert_eq!(cache.get("hot"), Some(7));
    }

    assert_eq!(cache.get("cold"), None);
}

#[test]
fn test_overwrite_resets_idle_clock() {
    let ttl = Duration::from_millis(120);
    let cache = store::<u32>(10);

    cache.set_with_ttl("k", 1, ttl);
    sleep(Duration::from_millis(80));
    cache.set_with_ttl("k", 2, ttl);
    sleep(Duration::from_millis(80));

    assert_eq!(cache.get("k"), Some(2));
}

// == Statistics ==

#[test]
fn test_clear_does_not_reset_statistics() {
    let cache = store::<u32>(1);

    cache.set("a", 1);
    cache.set("b", 2);
    cache.get("b");
    cache.get("a");

    let before = cache.snapshot();
    cache.clear();
    let after = cache.snapshot();

    assert_eq!(before.hits, 1);
    assert_eq!(before.misses, 1);
    assert_eq!(before.evictions, 1);
    assert_eq!(after.hits, before.hits);
    assert_eq!(after.misses, before.misses);
    assert_eq!(after.evictions, before.evictions);
    assert_eq!(after.size, 0);
}

// == Reaper ==

#[tokio::test]
async fn test_reaper_expires_full_store() {
    let cache = Arc::new(
        CacheStore::new(100, Duration::from_millis(250), Duration::from_millis(50)).unwrap(),
    );
    let shutdown = CancellationToken::new();
    let reaper = spawn_reaper(cache.clone(), shutdown.clone());

    for i in 0..100 {
        cache.set(i.to_string(), i);
    }

    tokio::time::sleep(Duration::from_millis(500)).await;

    let stats = cache.snapshot();
    assert_eq!(stats.evictions, 100);
    assert_eq!(stats.size, 0);
    for i in 0..100 {
        assert_eq!(cache.get(&i.to_string()), None);
    }

    shutdown.cancel();
    reaper.await.unwrap();
}

// == Concurrency ==

#[test]
fn test_concurrent_set_then_get() {
    let cache = Arc::new(store::<usize>(100));
    let barrier = Arc::new(Barrier::new(100));

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                cache.set(i.to_string(), i);
                barrier.wait();
                cache.get(&i.to_string())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(i));
    }

    let stats = cache.snapshot();
    assert_eq!(stats.hits, 100);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.size, 100);
}

#[test]
fn test_concurrent_inserts_evict_once_per_new_key() {
    let capacity = 16;
    let cache = Arc::new(store::<usize>(capacity));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..100 {
                    cache.set(format!("t{t}-{i}"), i);
                    assert!(cache.len() <= capacity);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), capacity);
    assert_eq!(cache.snapshot().evictions, (800 - capacity) as u64);
}

#[test]
fn test_concurrent_mixed_traffic_with_sweeps() {
    let cache = Arc::new(store::<usize>(32));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..200 {
                    cache.set_with_ttl(format!("{t}-{i}"), i, Duration::from_millis(5));
                    let _ = cache.get(&format!("{t}-{}", i / 2));
                    if i % 10 == 0 {
                        cache.delete(&format!("{t}-{}", i / 3));
                    }
                }
            })
        })
        .collect();

    let sweeper = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for _ in 0..50 {
                cache.clear_expired();
                sleep(Duration::from_millis(1));
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    sweeper.join().unwrap();

    assert!(cache.len() <= 32);
    let stats = cache.snapshot();
    assert_eq!(stats.hits + stats.misses, 800);

    sleep(Duration::from_millis(20));
    cache.clear_expired();
    assert!(cache.is_empty());
}

#[test]
fn test_keys_are_unique_after_racing_overwrites() {
    let cache = Arc::new(store::<usize>(8));
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.set("shared", t);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.snapshot().evictions, 0);
    let value = cache.get("shared").unwrap();
    assert!((0..16).collect::<HashSet<_>>().contains(&value));
}
