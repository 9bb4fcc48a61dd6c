//! Runtime options
//!
//! Defaults come from [`crate::constants`]. `Options` mirrors the option record
//! callers pass around (`{"CACHE_TTL": 120}`), and can also be read from the
//! environment.

use crate::{
    constants::{
        BACKOFF_JITTER, CACHE_TTL_ENV, DEFAULT_CACHE_TTL_SECS, INITIAL_BACKOFF_MS, LOCK_WAIT_MS,
        MAX_BACKOFF_MS, MAX_LOCK_ATTEMPTS,
    },
    error::PriceError,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for a current-prices run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// How long a cached response stays valid, in seconds. Zero or negative
    /// disables caching.
    #[serde(rename = "CACHE_TTL", default = "default_cache_ttl")]
    pub cache_ttl: i64,
}

fn default_cache_ttl() -> i64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for Options {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl Options {
    pub fn with_cache_ttl(cache_ttl: i64) -> Self {
        Self { cache_ttl }
    }

    /// Reads options from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, PriceError> {
        match std::env::var(CACHE_TTL_ENV) {
            Ok(raw) => Self::parse_ttl(&raw).map(Self::with_cache_ttl),
            Err(_) => Ok(Self::default()),
        }
    }

    fn parse_ttl(raw: &str) -> Result<i64, PriceError> {
        raw.trim().parse::<i64>().map_err(|e| {
            PriceError::config(format!("{} must be an integer number of seconds: {}", CACHE_TTL_ENV, e))
        })
    }

    /// True when responses may be served from the cache
    pub fn caching_enabled(&self) -> bool {
        self.cache_ttl > 0
    }
}

/// Retry policy for acquiring the fetch lock
#[derive(Debug, Clone, PartialEq)]
pub struct LockPolicy {
    /// Bounded wait of a single acquisition attempt
    pub wait: Duration,
    /// Attempts before reporting the lock as still held
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Relative jitter, e.g. 0.1 for ±10%
    pub jitter: f64,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            wait: Duration::from_millis(LOCK_WAIT_MS),
            max_attempts: MAX_LOCK_ATTEMPTS,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
            jitter: BACKOFF_JITTER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_is_two_minutes() {
        assert_eq!(Options::default().cache_ttl, 120);
        assert!(Options::default().caching_enabled());
    }

    #[test]
    fn test_deserialize_option_record() {
        let options: Options = serde_json::from_str(r#"{"CACHE_TTL": 30}"#).unwrap();
        assert_eq!(options.cache_ttl, 30);

        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_non_positive_ttl_disables_caching() {
        assert!(!Options::with_cache_ttl(0).caching_enabled());
        assert!(!Options::with_cache_ttl(-5).caching_enabled());
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(Options::parse_ttl(" 45 ").unwrap(), 45);
        assert!(matches!(
            Options::parse_ttl("soon"),
            Err(PriceError::Config(_))
        ));
    }
}
