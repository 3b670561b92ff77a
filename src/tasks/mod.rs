//! Background Tasks Module
//!
//! Tasks used by the soak runner.
//!
//! # Tasks
//! - Stats reporter: logs cache statistics at a configured interval
//! - Workload: blocking workers issuing a mixed stream of cache operations

mod reporter;
mod workload;

pub use reporter::spawn_stats_reporter;
pub use workload::{run_worker, spawn_workload, WorkerReport};
