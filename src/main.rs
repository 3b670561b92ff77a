//! FIFO TTL Cache - soak runner
//!
//! Builds a cache from the environment, drives it from several worker threads
//! and periodically logs its statistics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fifo_ttl_cache::tasks::{spawn_stats_reporter, spawn_workload, WorkerReport};
use fifo_ttl_cache::{Cache, SoakConfig};

/// Main entry point for the soak runner.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache
/// 4. Start the stats reporter and the worker threads
/// 5. Run until Ctrl+C/SIGTERM or the configured duration elapses
/// 6. Stop workers and log the final statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fifo_ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FIFO TTL cache soak run");

    let config = SoakConfig::from_env().context("loading soak configuration")?;
    info!(
        "Configuration loaded: max_entries={}, ttl={}s, workers={}, key_space={}, report_interval={}s",
        config.cache.max_entries,
        config.cache.ttl_secs,
        config.workers,
        config.key_space,
        config.report_interval_secs
    );

    let cache: Arc<Cache<u64, u64>> =
        Arc::new(Cache::from_config(&config.cache).context("creating cache")?);

    let reporter = spawn_stats_reporter(cache.clone(), config.report_interval());
    let stop = Arc::new(AtomicBool::new(false));
    let workers = spawn_workload(cache.clone(), config.workers, config.key_space, stop.clone());
    info!("{} workers started", workers.len());

    wait_for_shutdown(config.duration()).await;

    stop.store(true, Ordering::Relaxed);
    reporter.abort();

    let mut total = WorkerReport::default();
    for worker in workers {
        let report = worker.await.context("worker panicked")?;
        total.upserts += report.upserts;
        total.reads += report.reads;
        total.deletes += report.deletes;
    }

    let stats = cache.stats();
    info!(
        "Soak run complete: ops={} (upserts={}, reads={}, deletes={}), hits={}, misses={}, evictions={}, expirations={}, entries={}",
        total.total(),
        total.upserts,
        total.reads,
        total.deletes,
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.expirations,
        stats.total_entries
    );

    Ok(())
}

/// Waits for Ctrl+C, SIGTERM, or the end of the configured run.
async fn wait_for_shutdown(run_for: Option<std::time::Duration>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let deadline = async {
        match run_for {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping...");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping...");
        }
        _ = deadline => {
            info!("Run duration elapsed, stopping...");
        }
    }
}
