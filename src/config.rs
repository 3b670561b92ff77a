//! Configuration Module
//!
//! Handles loading cache and soak-run configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache sizing and expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Loads the cache configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds (default: 300)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries)?,
            ttl_secs: env_or("CACHE_TTL_SECS", defaults.ttl_secs)?,
        })
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl_secs: 300,
        }
    }
}

/// Settings for the soak runner binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoakConfig {
    pub cache: CacheConfig,
    /// Number of worker threads hammering the cache
    pub workers: usize,
    /// Keys are drawn from `0..key_space`
    pub key_space: u64,
    /// How long to run in seconds, 0 = until interrupted
    pub duration_secs: u64,
    /// Interval between statistics reports in seconds
    pub report_interval_secs: u64,
}

impl SoakConfig {
    /// Loads the soak configuration from environment variables.
    ///
    /// # Environment Variables
    /// - everything [`CacheConfig::from_env`] reads
    /// - `SOAK_WORKERS` - Worker threads (default: 4)
    /// - `SOAK_KEY_SPACE` - Distinct keys touched (default: 5000)
    /// - `SOAK_DURATION_SECS` - Run length, 0 = until Ctrl+C (default: 0)
    /// - `REPORT_INTERVAL_SECS` - Stats report frequency (default: 5)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            cache: CacheConfig::from_env()?,
            workers: env_or("SOAK_WORKERS", defaults.workers)?,
            key_space: env_or("SOAK_KEY_SPACE", defaults.key_space)?,
            duration_secs: env_or("SOAK_DURATION_SECS", defaults.duration_secs)?,
            report_interval_secs: env_or("REPORT_INTERVAL_SECS", defaults.report_interval_secs)?,
        })
    }

    /// Run length, None = until interrupted.
    pub fn duration(&self) -> Option<Duration> {
        (self.duration_secs > 0).then(|| Duration::from_secs(self.duration_secs))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs.max(1))
    }
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            workers: 4,
            key_space: 5000,
            duration_secs: 0,
            report_interval_secs: 5,
        }
    }
}

// Unset falls back to the default, set-but-garbage is an error.
fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig(format!("{name}={raw:?} is not a valid value"))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(raw)) => Err(CacheError::InvalidConfig(format!(
            "{name}={raw:?} is not valid UTF-8"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.ttl_secs, 300);
        assert_eq!(config.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_soak_config_default() {
        let config = SoakConfig::default();
        assert_eq!(config.workers, 4);
        assert_eq!(config.key_space, 5000);
        assert_eq!(config.duration(), None);
        assert_eq!(config.report_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_report_interval_is_at_least_one_second() {
        let config = SoakConfig {
            report_interval_secs: 0,
            ..SoakConfig::default()
        };
        assert_eq!(config.report_interval(), Duration::from_secs(1));
    }

    // Each test uses its own variable name so parallel tests do not race.
    #[test]
    fn test_env_or_unset_uses_default() {
        env::remove_var("FIFO_TTL_CACHE_TEST_UNSET");
        assert_eq!(env_or("FIFO_TTL_CACHE_TEST_UNSET", 17usize), Ok(17));
    }

    #[test]
    fn test_env_or_parses_value() {
        env::set_var("FIFO_TTL_CACHE_TEST_SET", " 64 ");
        assert_eq!(env_or("FIFO_TTL_CACHE_TEST_SET", 17usize), Ok(64));
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        env::set_var("FIFO_TTL_CACHE_TEST_BAD", "lots");
        let result = env_or("FIFO_TTL_CACHE_TEST_BAD", 17usize);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_env_or_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("FIFO_TTL_CACHE_TEST_NON_UTF8", OsStr::from_bytes(&[0x66, 0xff, 0x6f]));
        let result = env_or("FIFO_TTL_CACHE_TEST_NON_UTF8", 17usize);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }
}
