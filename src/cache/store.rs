//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with FIFO ordering and TTL expiration.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, Clock, InsertionOrder, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache State ==
/// Everything the lock protects.
#[derive(Debug)]
struct CacheState<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Insertion order, oldest first
    order: InsertionOrder<K>,
    /// Performance statistics
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> CacheState<K, V> {
    /// Drops a key from both the map and the order. Returns whether it was present.
    fn remove(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }

    /// Drops the oldest inserted key, expired or not.
    fn evict_oldest(&mut self) {
        if let Some(oldest) = self.order.pop_oldest() {
            self.entries.remove(&oldest);
            self.stats.record_eviction();
            trace!(remaining = self.entries.len(), "evicted oldest entry");
        }
    }
}

// == Cache ==
/// Bounded, thread-safe cache with TTL expiration and FIFO eviction.
///
/// Expired entries are removed lazily when a read observes them (or on an
/// explicit [`Cache::purge_expired`]); until then they still occupy a slot.
/// When full, an upsert of a new key evicts the oldest inserted key. Reads
/// never refresh an entry's position; re-upserting a key moves it to the
/// newest position and restarts its TTL.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use fifo_ttl_cache::cache::Cache;
///
/// let cache = Cache::new(3, Duration::from_secs(60)).unwrap();
/// cache.upsert(1, 1);
/// cache.upsert(2, 2);
/// cache.upsert(3, 3);
/// assert_eq!(cache.get(&1), Some(1));
///
/// cache.upsert(1, 10);
/// cache.upsert(4, 4);
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&1), Some(10));
/// ```
#[derive(Debug)]
pub struct Cache<K, V> {
    state: Mutex<CacheState<K, V>>,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Lifetime of every entry, counted from its last upsert
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache using the system clock.
    ///
    /// # Errors
    /// [`CacheError::ZeroCapacity`] if `max_entries` is 0.
    pub fn new(max_entries: usize, ttl: Duration) -> Result<Self> {
        Self::with_clock(max_entries, ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(max_entries: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        if max_entries == 0 {
            return Err(CacheError::ZeroCapacity);
        }

        Ok(Self {
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(max_entries),
                order: InsertionOrder::with_capacity(max_entries),
                stats: CacheStats::new(),
            }),
            max_entries,
            ttl,
            clock,
        })
    }

    /// Creates a cache sized and timed by `config`.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.max_entries, config.ttl())
    }

    // Reads mutate on expiry, so every operation takes the lock exclusively,
    // and reads the clock only once the lock is held.
    // Cache code never panics mid-update, so a poisoned lock still guards a
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Returns a copy of the value for `key` if present and not expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.lock();
        let now = self.clock.now();

        let Some(expired) = state.entries.get(key).map(|entry| entry.is_expired(now)) else {
            state.stats.record_miss();
            return None;
        };

        if expired {
            state.remove(key);
            state.stats.record_expirations(1);
            state.stats.record_miss();
            trace!(remaining = state.entries.len(), "removed expired entry on read");
            return None;
        }

        let value = state.entries.get(key).map(|entry| entry.value.clone());
        state.stats.record_hit();
        value
    }

    // == Upsert ==
    /// Inserts or replaces the value for `key`.
    ///
    /// An existing key is removed and re-inserted: its value and TTL are reset
    /// and it becomes the newest key. A new key arriving at a full cache first
    /// evicts the oldest key, expired or not.
    pub fn upsert(&self, key: K, value: V) {
        let mut state = self.lock();
        let now = self.clock.now();

        if !state.remove(&key) && state.entries.len() >= self.max_entries {
            state.evict_oldest();
        }

        state.order.push(key.clone());
        state.entries.insert(key, CacheEntry::new(value, now, self.ttl));
    }

    // == Delete ==
    /// Removes `key` if present. Deleting an absent key does nothing.
    pub fn delete(&self, key: &K) {
        self.lock().remove(key);
    }

    // == Purge Expired ==
    /// Removes every expired entry now instead of waiting for reads to find them.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut state = self.lock();
        let now = self.clock.now();

        let CacheState {
            entries,
            order,
            stats,
        } = &mut *state;

        let before = order.len();
        order.retain(|key| !entries.get(key).is_some_and(|entry| entry.is_expired(now)));
        let count = before - order.len();

        if count > 0 {
            entries.retain(|_, entry| !entry.is_expired(now));
            stats.record_expirations(count);
        }

        debug!(removed = count, remaining = entries.len(), "purged expired entries");
        count
    }

    // == Keys ==
    /// Returns the stored keys oldest first, including expired ones not yet removed.
    pub fn keys(&self) -> Vec<K> {
        self.lock().order.iter().cloned().collect()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, counting expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries, expired or not.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of entries the cache holds.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    // == TTL ==
    /// Returns the lifetime given to every entry on upsert.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        let state = self.lock();
        assert_eq!(state.order.len(), state.entries.len(), "order and map sizes differ");
        assert!(state.entries.len() <= self.max_entries, "capacity exceeded");
        for key in state.order.iter() {
            assert!(state.entries.contains_key(key), "ordered key missing from map");
        }
    }
}
