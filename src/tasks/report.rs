//! Stats Reporter Task
//!
//! Background task that periodically logs cache statistics, so unexpected
//! extra writes show up in the controller's logs without polling.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::shared::SharedRepoCache;

/// Spawns a background task that logs a [`CacheStats`](crate::cache::CacheStats)
/// snapshot every `interval_secs` seconds.
///
/// Reports at info level when checks or writes happened since the previous
/// report, at debug level otherwise.
///
/// # Returns
/// A JoinHandle for the spawned task, to be aborted on shutdown, or `None`
/// when `interval_secs` is 0 (reporting disabled, nothing is spawned).
///
/// # Example
/// ```ignore
/// let cache = SharedRepoCache::from_config(&config, Arc::new(TracingLogger));
/// let reporter = spawn_stats_reporter(cache.clone(), config.stats_interval);
/// // Later, during shutdown:
/// if let Some(reporter) = reporter {
///     reporter.abort();
/// }
/// ```
pub fn spawn_stats_reporter(cache: SharedRepoCache, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        debug!("Cache stats reporter disabled");
        return None;
    }
    let interval = Duration::from_secs(interval_secs);

    Some(tokio::spawn(async move {
        info!(
            "Starting cache stats reporter with interval of {} seconds",
            interval_secs
        );

        let mut last_activity = 0;
        loop {
            tokio::time::sleep(interval).await;

            let stats = cache.stats().await;
            let activity = stats.checks() + stats.writes;

            if activity != last_activity {
                info!(
                    hits = stats.hits,
                    misses = stats.misses(),
                    writes = stats.writes,
                    evictions = stats.evictions,
                    entries = stats.total_entries,
                    hit_rate = stats.hit_rate(),
                    "submission cache stats"
                );
            } else {
                debug!(entries = stats.total_entries, "submission cache idle");
            }
            last_activity = activity;
        }
    }))
}
