//! Token-bucket rate limiter shared by both limiter registries.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorLimiter,
};

use crate::error::ConfigError;

/// Immutable limiter configuration: at most `max_requests` per `interval`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ozon_seller_api::RateLimitConfig;
///
/// let config = RateLimitConfig::new(2, Duration::from_millis(500)).unwrap();
/// assert_eq!(config.max_requests(), 2);
///
/// assert!(RateLimitConfig::new(0, Duration::from_secs(1)).is_err());
/// assert!(RateLimitConfig::new(1, Duration::ZERO).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    max_requests: u32,
    interval: Duration,
}

impl RateLimitConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if `max_requests` is zero or
    /// `interval` is zero.
    pub fn new(max_requests: u32, interval: Duration) -> Result<Self, ConfigError> {
        if max_requests == 0 || interval.is_zero() {
            return Err(ConfigError::InvalidRateLimit {
                max_requests,
                interval_secs: interval.as_secs_f64(),
            });
        }
        Ok(Self {
            max_requests,
            interval,
        })
    }

    /// `max_requests` per second.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if `max_requests` is zero.
    pub fn per_second(max_requests: u32) -> Result<Self, ConfigError> {
        Self::new(max_requests, Duration::from_secs(1))
    }

    /// Maximum requests admitted per interval.
    #[must_use]
    pub const fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Length of the interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    fn quota(&self) -> Result<Quota, ConfigError> {
        let invalid = || ConfigError::InvalidRateLimit {
            max_requests: self.max_requests,
            interval_secs: self.interval.as_secs_f64(),
        };
        let burst = NonZeroU32::new(self.max_requests).ok_or_else(invalid)?;
        let replenish = self.interval / self.max_requests;
        Ok(Quota::with_period(replenish).ok_or_else(invalid)?.allow_burst(burst))
    }
}

/// A token-bucket limiter with FIFO admission.
///
/// The bucket holds `max_requests` tokens and refills one token every
/// `interval / max_requests`. Callers that find it empty wait in arrival
/// order.
pub struct RateLimiter {
    config: RateLimitConfig,
    limiter: GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>,
    queue: tokio::sync::Mutex<()>,
    last_used: Mutex<Instant>,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("last_used", &self.last_used())
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Creates a limiter with a full bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if the configuration cannot
    /// be expressed as a quota.
    pub fn new(config: RateLimitConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config,
            limiter: GovernorLimiter::direct(config.quota()?),
            queue: tokio::sync::Mutex::new(()),
            last_used: Mutex::new(Instant::now()),
        })
    }

    /// Waits until the bucket admits one request.
    pub async fn acquire(&self) {
        let _turn = self.queue.lock().await;
        self.limiter.until_ready().await;
        self.touch();
    }

    /// The configuration this limiter was built with.
    #[must_use]
    pub const fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// When a request was last admitted (or the limiter was created).
    #[must_use]
    pub fn last_used(&self) -> Instant {
        self.last_used
            .lock()
            .map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
    }

    fn touch(&self) {
        let now = Instant::now();
        match self.last_used.lock() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }
}
