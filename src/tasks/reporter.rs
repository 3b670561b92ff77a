//! Stats Reporter Task
//!
//! Background task that periodically logs a snapshot of the cache statistics.
//! It only reads; expired entries are still removed lazily by the cache itself.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::Cache;

/// Spawns a background task that logs cache statistics every `interval`.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Cache::new(1000, Duration::from_secs(300))?);
/// let reporter = spawn_stats_reporter(cache.clone(), Duration::from_secs(5));
/// // Later, during shutdown:
/// reporter.abort();
/// ```
pub fn spawn_stats_reporter<K, V>(cache: Arc<Cache<K, V>>, interval: Duration) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!("Starting stats reporter with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let stats = cache.stats();
            match serde_json::to_string(&stats) {
                Ok(json) => info!(hit_rate = stats.hit_rate(), "cache stats: {}", json),
                Err(err) => warn!("failed to serialize cache stats: {}", err),
            }
        }
    })
}
