//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and FIFO eviction.
//!
//! Entries and the insertion order stay private to [`Cache`]:
//!
//! ```compile_fail
//! use fifo_ttl_cache::cache::CacheEntry;
//! ```
//!
//! ```compile_fail
//! use fifo_ttl_cache::cache::InsertionOrder;
//! ```

mod clock;
mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub(crate) use entry::CacheEntry;
pub(crate) use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::Cache;
