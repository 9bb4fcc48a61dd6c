//! Fetch lock
//!
//! Only one run at a time may sit in the cache-or-fetch critical section. The
//! lock itself lives behind [`LockBackend`] so a host can plug in shared state
//! spanning processes; [`LocalLock`] covers the in-process case.
//!
//! Contention is retried in a loop with exponential backoff and jitter, and
//! reported as [`PriceError::Locked`] once the attempts run out.

use crate::{config::LockPolicy, error::PriceError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use uuid::Uuid;

/// Exclusive ownership of the fetch lock
///
/// Releasing happens on drop; [`LockHandle::release`] makes it explicit.
pub struct LockHandle {
    id: Uuid,
    acquired_at: DateTime<Utc>,
    _guard: Box<dyn Any + Send + Sync>,
}

impl LockHandle {
    /// Wraps whatever keeps the backend's lock held
    pub fn new(guard: impl Any + Send + Sync) -> Self {
        Self {
            id: Uuid::new_v4(),
            acquired_at: Utc::now(),
            _guard: Box::new(guard),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// Releases the lock
    pub fn release(self) {
        tracing::debug!(lock_id = %self.id, "Releasing fetch lock");
    }
}

impl fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockHandle")
            .field("id", &self.id)
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

/// A mutual-exclusion primitive with bounded blocking
#[async_trait]
pub trait LockBackend: Send + Sync {
    /// Tries to take the lock, blocking at most `wait`
    ///
    /// Returns `None` if the lock is still held elsewhere when `wait` elapses.
    async fn try_acquire(&self, wait: Duration) -> Option<LockHandle>;

    /// Returns the name of this backend
    fn backend_name(&self) -> &'static str;
}

/// In-process lock backed by a tokio mutex
#[derive(Clone, Default)]
pub struct LocalLock {
    mutex: Arc<Mutex<()>>,
}

impl LocalLock {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockBackend for LocalLock {
    async fn try_acquire(&self, wait: Duration) -> Option<LockHandle> {
        timeout(wait, self.mutex.clone().lock_owned())
            .await
            .ok()
            .map(LockHandle::new)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

/// Acquires the fetch lock under a [`LockPolicy`]
#[derive(Clone)]
pub struct LockManager {
    backend: Arc<dyn LockBackend>,
    policy: LockPolicy,
}

impl LockManager {
    pub fn new(backend: Arc<dyn LockBackend>, policy: LockPolicy) -> Self {
        Self { backend, policy }
    }

    /// In-process lock with the default policy
    pub fn local() -> Self {
        Self::new(Arc::new(LocalLock::new()), LockPolicy::default())
    }

    pub fn policy(&self) -> &LockPolicy {
        &self.policy
    }

    /// Acquires the lock, retrying with backoff while it is busy
    pub async fn acquire(&self) -> Result<LockHandle, PriceError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.initial_backoff.min(self.policy.max_backoff);

        for attempt in 1..=max_attempts {
            if let Some(handle) = self.backend.try_acquire(self.policy.wait).await {
                tracing::debug!(
                    lock_id = %handle.id(),
                    attempt = attempt,
                    backend = self.backend.backend_name(),
                    "Acquired fetch lock"
                );
                return Ok(handle);
            }

            tracing::warn!(
                attempt = attempt,
                max_attempts = max_attempts,
                backend = self.backend.backend_name(),
                "Fetch lock busy"
            );

            if attempt < max_attempts {
                sleep(jittered(backoff, self.policy.jitter)).await;
                backoff = next_backoff(backoff, self.policy.max_backoff);
            }
        }

        Err(PriceError::Locked {
            attempts: max_attempts,
        })
    }
}

/// Doubles `backoff`, capped at `max`
fn next_backoff(backoff: Duration, max: Duration) -> Duration {
    backoff.saturating_mul(2).min(max)
}

/// Scales `delay` by a random factor in `[1 - jitter, 1 + jitter]`
fn jittered(delay: Duration, jitter: f64) -> Duration {
    if jitter <= 0.0 || !jitter.is_finite() {
        return delay;
    }
    let jitter = jitter.min(1.0);
    let factor = 1.0 + rand::thread_rng().gen_range(-jitter..=jitter);
    Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
}
