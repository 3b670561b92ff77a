//! FIFO TTL Cache - A bounded in-process cache
//!
//! Entries expire a fixed TTL after their last upsert and are evicted in
//! insertion order once the cache is full.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::{CacheConfig, SoakConfig};
pub use error::{CacheError, Result};
