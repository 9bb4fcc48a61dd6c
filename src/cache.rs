//! In-memory response cache
//!
//! Entries expire lazily: an expired entry is treated as absent on lookup and
//! only dropped when the map is full or on an explicit [`ResponseCache::purge_expired`].

use crate::{
    constants::{DEFAULT_CACHE_CAPACITY, MAX_CACHE_TTL_SECS},
    types::{ApiRequest, HttpMethod},
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Cache key derived from every part of a request
///
/// Two keys are equal only when every request part is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: HttpMethod,
    path: String,
    query: String,
    body: String,
    public: bool,
}

impl CacheKey {
    pub fn for_request(request: &ApiRequest) -> Self {
        Self {
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            public: request.public,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visibility = if self.public { "public" } else { "private" };
        write!(
            f,
            "{} {} query={:?} body={:?} {}",
            self.method, self.path, self.query, self.body, visibility
        )
    }
}

/// A cached response
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Arc<Value>,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Shared response cache with a bounded number of entries
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    capacity: usize,
}

impl ResponseCache {
    /// Creates an empty cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Returns the payload for `key` unless missing or expired
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Value>> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.is_expired(Instant::now()) {
            tracing::debug!(key = %key, "Cache entry expired");
            return None;
        }
        Some(entry.payload.clone())
    }

    /// Stores `payload` under `key` for `ttl`
    ///
    /// Overwrites any previous entry for the same key. `ttl` is capped at
    /// `MAX_CACHE_TTL_SECS`.
    pub async fn insert(&self, key: CacheKey, payload: Arc<Value>, ttl: Duration) {
        let now = Instant::now();
        let expires_at = expiry(now, ttl);
        let mut entries = self.entries.write().await;

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, entry| !entry.is_expired(now));
            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    tracing::debug!(key = %oldest, "Evicting cache entry");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                payload,
                fetched_at: Utc::now(),
                expires_at,
            },
        );
    }

    /// Drops every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn expiry(now: Instant, ttl: Duration) -> Instant {
    let max = Duration::from_secs(MAX_CACHE_TTL_SECS);
    let ttl = ttl.min(max);
    now.checked_add(ttl)
        .or_else(|| now.checked_add(max))
        .unwrap_or(now)
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
