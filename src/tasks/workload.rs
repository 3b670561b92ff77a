//! Synthetic Workload
//!
//! Drives a shared cache from blocking worker threads with a fixed mix of
//! upserts, reads and deletes over overlapping keys.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::Cache;

/// Operations performed by one worker before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub upserts: u64,
    pub reads: u64,
    pub deletes: u64,
}

impl WorkerReport {
    pub fn total(&self) -> u64 {
        self.upserts + self.reads + self.deletes
    }
}

// Step through the key space with a stride coprime to most sizes so workers
// overlap without marching in lockstep.
const KEY_STRIDE: u64 = 7919;

/// Runs one worker loop on the current thread until `stop` is set or
/// `max_ops` operations have run.
///
/// Roughly half of the operations are reads, 40% upserts and 10% deletes.
pub fn run_worker(
    cache: &Cache<u64, u64>,
    worker_id: u64,
    key_space: u64,
    max_ops: Option<u64>,
    stop: &AtomicBool,
) -> WorkerReport {
    let key_space = key_space.max(1);
    let mut report = WorkerReport::default();
    let mut step = 0u64;

    while !stop.load(Ordering::Relaxed) && max_ops.map_or(true, |max| step < max) {
        let key = (step.wrapping_mul(KEY_STRIDE).wrapping_add(worker_id)) % key_space;
        match step % 10 {
            0..=4 => {
                cache.get(&key);
                report.reads += 1;
            }
            5..=8 => {
                cache.upsert(key, step);
                report.upserts += 1;
            }
            _ => {
                cache.delete(&key);
                report.deletes += 1;
            }
        }
        step += 1;
    }

    debug!(worker_id, ops = report.total(), "worker stopped");
    report
}

/// Spawns `workers` blocking workers sharing `cache` until `stop` is set.
pub fn spawn_workload(
    cache: Arc<Cache<u64, u64>>,
    workers: usize,
    key_space: u64,
    stop: Arc<AtomicBool>,
) -> Vec<JoinHandle<WorkerReport>> {
    (0..workers as u64)
        .map(|worker_id| {
            let cache = Arc::clone(&cache);
            let stop = Arc::clone(&stop);
            tokio::task::spawn_blocking(move || run_worker(&cache, worker_id, key_space, None, &stop))
        })
        .collect()
}
