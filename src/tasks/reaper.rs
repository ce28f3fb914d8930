//! TTL Reaper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries out of `cache`.
///
/// The first sweep runs one `reap_interval` after the task starts, then every
/// `reap_interval` after that. A sweep holds the store's write lock for the
/// duration of one scan and is never interrupted midway.
///
/// The task runs until `shutdown` is cancelled. Cancel the token and await
/// the returned handle to join the task during teardown.
///
/// # Example
/// ```no_run
/// # use std::{sync::Arc, time::Duration};
/// # use tokio_util::sync::CancellationToken;
/// # use ttl_cache::{cache::CacheStore, spawn_reaper};
/// # async fn run() -> ttl_cache::error::Result<()> {
/// let cache = Arc::new(CacheStore::<String>::new(
///     1000,
///     Duration::from_secs(300),
///     Duration::from_secs(1),
/// )?);
/// let shutdown = CancellationToken::new();
/// let reaper = spawn_reaper(cache.clone(), shutdown.clone());
///
/// // Later, during teardown:
/// shutdown.cancel();
/// let _ = reaper.await;
/// # Ok(())
/// # }
/// ```
pub fn spawn_reaper<V>(cache: Arc<CacheStore<V>>, shutdown: CancellationToken) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    let period = cache.reap_interval();

    tokio::spawn(async move {
        info!(interval = ?period, "Starting TTL reaper");

        // An interval too large to schedule never ticks; just wait for shutdown.
        let Some(start) = Instant::now().checked_add(period) else {
            warn!(interval = ?period, "Reap interval out of range, TTL sweeps disabled");
            shutdown.cancelled().await;
            info!("TTL reaper stopped");
            return;
        };

        let mut ticker = time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = cache.clear_expired();
                    if removed > 0 {
                        info!(removed, "TTL reaper: removed expired entries");
                    } else {
                        debug!("TTL reaper: no expired entries found");
                    }
                }
            }
        }

        info!("TTL reaper stopped");
    })
}
