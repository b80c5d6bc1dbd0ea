//! Per-method rate limiting.
//!
//! Some Seller API methods carry their own quota on top of the aggregate
//! per-credential budget. A [`MethodRateLimit`] declares that quota next to
//! the facade method, and [`MethodRateLimiterRegistry`] holds one limiter per
//! `(credential identity, method)` pair.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::ConfigError;
use crate::limits::bucket::{RateLimitConfig, RateLimiter};
use crate::limits::sweeper::{Sweep, Sweeper};

/// A per-method quota declared alongside the method.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ozon_seller_api::MethodRateLimit;
///
/// const BARCODE_ADD: MethodRateLimit =
///     MethodRateLimit::new(20, Duration::from_secs(60), "SellerClient::barcode_add");
///
/// assert_eq!(BARCODE_ADD.limit_requests, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodRateLimit {
    /// Requests admitted per interval.
    pub limit_requests: u32,
    /// Interval length.
    pub interval: Duration,
    /// Identifier of the limited method, conventionally `Type::method`.
    pub method_identifier: &'static str,
}

impl MethodRateLimit {
    /// Declares a method quota.
    #[must_use]
    pub const fn new(
        limit_requests: u32,
        interval: Duration,
        method_identifier: &'static str,
    ) -> Self {
        Self {
            limit_requests,
            interval,
            method_identifier,
        }
    }

    /// The limiter configuration for this quota.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] for a zero count or interval.
    pub fn config(&self) -> Result<RateLimitConfig, ConfigError> {
        RateLimitConfig::new(self.limit_requests, self.interval)
    }
}

/// Registry key: credential identity plus method identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodKey {
    /// The credential identity.
    pub identity: String,
    /// The method identifier.
    pub method: String,
}

#[derive(Debug)]
struct MethodEntry {
    limiter: Arc<RateLimiter>,
    created_at: Instant,
}

/// Snapshot of one method limiter entry.
#[derive(Clone, Debug)]
pub struct MethodLimiterStats {
    /// The limiter configuration.
    pub config: RateLimitConfig,
    /// When the entry was created.
    pub created_at: Instant,
    /// When the limiter last admitted a request.
    pub last_used: Instant,
    /// Time since creation.
    pub time_since_creation: Duration,
    /// Time since the last admitted request.
    pub time_since_usage: Duration,
}

/// Registry of per-method limiters keyed by `(identity, method)`.
///
/// Entries are evicted once no caller holds the limiter and at least
/// `min_instance_ttl` has passed since both creation and last use.
#[derive(Debug)]
pub struct MethodRateLimiterRegistry {
    entries: Mutex<HashMap<MethodKey, MethodEntry>>,
    cleanup_interval: Duration,
    min_instance_ttl: Duration,
    sweeper: Sweeper,
}

impl MethodRateLimiterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(cleanup_interval: Duration, min_instance_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            cleanup_interval,
            min_instance_ttl,
            sweeper: Sweeper::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<MethodKey, MethodEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns the limiter for `(identity, limit.method_identifier)`,
    /// creating it from `limit` on first use.
    ///
    /// An existing entry keeps its original configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if a new entry would be
    /// created from an invalid quota.
    pub fn get_limiter(
        &self,
        identity: &str,
        limit: &MethodRateLimit,
    ) -> Result<Arc<RateLimiter>, ConfigError> {
        let key = MethodKey {
            identity: identity.to_string(),
            method: limit.method_identifier.to_string(),
        };
        let mut entries = self.lock();
        if let Some(entry) = entries.get(&key) {
            return Ok(Arc::clone(&entry.limiter));
        }

        let limiter = Arc::new(RateLimiter::new(limit.config()?)?);
        tracing::debug!(
            identity,
            method = limit.method_identifier,
            limit_requests = limit.limit_requests,
            interval_secs = limit.interval.as_secs_f64(),
            "Registered method rate limiter"
        );
        entries.insert(
            key,
            MethodEntry {
                limiter: Arc::clone(&limiter),
                created_at: Instant::now(),
            },
        );
        Ok(limiter)
    }

    /// Evicts idle entries, returning how many were removed.
    pub fn sweep(&self) -> usize {
        let ttl = self.min_instance_ttl;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, entry| {
            let in_use = Arc::strong_count(&entry.limiter) > 1;
            let keep = in_use
                || entry.created_at.elapsed() < ttl
                || entry.limiter.last_used().elapsed() < ttl;
            if !keep {
                tracing::debug!(
                    identity = key.identity.as_str(),
                    method = key.method.as_str(),
                    "Evicting method rate limiter"
                );
            }
            keep
        });
        before - entries.len()
    }

    /// Returns `true` if the pair has an entry.
    #[must_use]
    pub fn contains(&self, identity: &str, method_identifier: &str) -> bool {
        self.lock().contains_key(&MethodKey {
            identity: identity.to_string(),
            method: method_identifier.to_string(),
        })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Per-key snapshot of every entry.
    #[must_use]
    pub fn stats(&self) -> HashMap<MethodKey, MethodLimiterStats> {
        self.lock()
            .iter()
            .map(|(key, entry)| {
                let last_used = entry.limiter.last_used();
                let stats = MethodLimiterStats {
                    config: entry.limiter.config(),
                    created_at: entry.created_at,
                    last_used,
                    time_since_creation: entry.created_at.elapsed(),
                    time_since_usage: last_used.elapsed(),
                };
                (key.clone(), stats)
            })
            .collect()
    }

    /// Starts the periodic sweep. Must be called within a Tokio runtime.
    pub fn start(self: &Arc<Self>) {
        self.sweeper
            .start(Arc::downgrade(self), self.cleanup_interval, "method");
    }

    /// Stops the periodic sweep, waiting for the task to finish.
    pub async fn shutdown(&self) {
        self.sweeper.shutdown().await;
    }

    /// Returns `true` while the periodic sweep runs.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sweeper.is_running()
    }
}

impl Sweep for MethodRateLimiterRegistry {
    fn evict_idle(&self) -> usize {
        self.sweep()
    }
}
