//! Shared governance state for every client in a process.
//!
//! A [`SellerRuntime`] bundles the session pool and both limiter registries.
//! Construct one at startup, pass it to each [`SellerClient`](crate::SellerClient),
//! and bracket its use with [`initialize`](SellerRuntime::initialize) and
//! [`shutdown`](SellerRuntime::shutdown).
//!
//! # Example
//!
//! ```rust,ignore
//! use ozon_seller_api::{SellerClient, SellerConfig, SellerRuntime};
//!
//! let runtime = SellerRuntime::new();
//! runtime.initialize();
//!
//! let client = SellerClient::new(&runtime, SellerConfig::from_env()?)?;
//! let info = client.seller_info().await?;
//!
//! client.close();
//! runtime.shutdown().await;
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::clients::SessionPool;
use crate::config::SellerConfig;
use crate::error::ConfigError;
use crate::limits::{
    ClientLimiterStats, ClientRateLimiterRegistry, MethodKey, MethodLimiterStats,
    MethodRateLimiterRegistry,
};

/// Default interval between limiter sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);
/// Default minimum age before an idle limiter may be evicted.
pub const DEFAULT_MIN_INSTANCE_TTL: Duration = Duration::from_secs(300);

/// Session pool plus client and method limiter registries.
///
/// Cloning is cheap and every clone shares the same state.
///
/// # Thread Safety
///
/// `SellerRuntime` is `Send + Sync`.
#[derive(Clone, Debug)]
pub struct SellerRuntime {
    sessions: Arc<SessionPool>,
    client_limiters: Arc<ClientRateLimiterRegistry>,
    method_limiters: Option<Arc<MethodRateLimiterRegistry>>,
}

// Verify SellerRuntime is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SellerRuntime>();
};

impl Default for SellerRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl SellerRuntime {
    /// Creates a runtime with default sweep settings.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().assemble()
    }

    /// Creates a runtime using the sweep settings of `config`.
    ///
    /// The settings were validated when `config` was built.
    #[must_use]
    pub fn from_config(config: &SellerConfig) -> Self {
        Self::builder()
            .cleanup_interval(config.cleanup_interval())
            .min_instance_ttl(config.min_instance_ttl())
            .assemble()
    }

    /// Returns a builder for customizing sweep settings.
    #[must_use]
    pub fn builder() -> SellerRuntimeBuilder {
        SellerRuntimeBuilder::default()
    }

    /// Starts the background sweeps of both registries.
    ///
    /// Idempotent. Must be called within a Tokio runtime.
    pub fn initialize(&self) {
        self.client_limiters.start();
        if let Some(method_limiters) = &self.method_limiters {
            method_limiters.start();
        }
        tracing::debug!(
            method_limits = self.method_limiters.is_some(),
            "Seller runtime initialized"
        );
    }

    /// Stops both sweeps, waiting for them to finish, and closes every
    /// pooled session. Safe to call without [`initialize`](Self::initialize).
    pub async fn shutdown(&self) {
        self.client_limiters.shutdown().await;
        if let Some(method_limiters) = &self.method_limiters {
            method_limiters.shutdown().await;
        }
        self.sessions.close_all();
        tracing::debug!("Seller runtime shut down");
    }

    /// The session pool.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionPool> {
        &self.sessions
    }

    /// The per-credential limiter registry.
    #[must_use]
    pub const fn client_limiters(&self) -> &Arc<ClientRateLimiterRegistry> {
        &self.client_limiters
    }

    /// The per-method limiter registry, if method limits are enabled.
    #[must_use]
    pub const fn method_limiters(&self) -> Option<&Arc<MethodRateLimiterRegistry>> {
        self.method_limiters.as_ref()
    }

    /// Snapshot of both limiter registries and the session pool.
    #[must_use]
    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            client_limiters: self.client_limiters.stats(),
            method_limiters: self
                .method_limiters
                .as_ref()
                .map(|registry| registry.stats())
                .unwrap_or_default(),
            method_limits_enabled: self.method_limiters.is_some(),
            sessions: self.sessions.session_count(),
            sweeping: self.client_limiters.is_running(),
        }
    }
}

/// Aggregated view returned by [`SellerRuntime::stats`].
#[derive(Clone, Debug)]
pub struct RuntimeStats {
    /// Client limiter entries keyed by credential identity.
    pub client_limiters: HashMap<String, ClientLimiterStats>,
    /// Method limiter entries. Empty when method limits are disabled.
    pub method_limiters: HashMap<MethodKey, MethodLimiterStats>,
    /// Whether the runtime has a method limiter registry.
    pub method_limits_enabled: bool,
    /// Number of open pooled sessions.
    pub sessions: usize,
    /// Whether the background sweep is running.
    pub sweeping: bool,
}

/// Builder for [`SellerRuntime`].
#[derive(Debug)]
pub struct SellerRuntimeBuilder {
    cleanup_interval: Duration,
    min_instance_ttl: Duration,
    method_limits: bool,
}

impl Default for SellerRuntimeBuilder {
    fn default() -> Self {
        Self {
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            min_instance_ttl: DEFAULT_MIN_INSTANCE_TTL,
            method_limits: true,
        }
    }
}

impl SellerRuntimeBuilder {
    /// Sets the interval between limiter sweeps.
    #[must_use]
    pub const fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Sets the minimum age before an idle limiter may be evicted.
    #[must_use]
    pub const fn min_instance_ttl(mut self, ttl: Duration) -> Self {
        self.min_instance_ttl = ttl;
        self
    }

    /// Enables or disables the per-method limiter registry.
    ///
    /// Without it, methods declaring a [`MethodRateLimit`](crate::MethodRateLimit)
    /// run unthrottled at the method level and a warning is logged.
    #[must_use]
    pub const fn method_limits(mut self, enabled: bool) -> Self {
        self.method_limits = enabled;
        self
    }

    /// Builds the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] if the cleanup interval is zero.
    pub fn build(self) -> Result<SellerRuntime, ConfigError> {
        if self.cleanup_interval.is_zero() {
            return Err(ConfigError::OutOfRange {
                field: "cleanup_interval",
                value: "0".to_string(),
                expected: "a positive number of seconds",
            });
        }
        Ok(self.assemble())
    }

    fn assemble(self) -> SellerRuntime {
        SellerRuntime {
            sessions: Arc::new(SessionPool::new()),
            client_limiters: Arc::new(ClientRateLimiterRegistry::new(
                self.cleanup_interval,
                self.min_instance_ttl,
            )),
            method_limiters: self.method_limits.then(|| {
                Arc::new(MethodRateLimiterRegistry::new(
                    self.cleanup_interval,
                    self.min_instance_ttl,
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_and_shutdown() {
        let runtime = SellerRuntime::new();
        runtime.initialize();
        runtime.initialize();
        assert!(runtime.client_limiters().is_running());
        assert!(runtime.method_limiters().unwrap().is_running());

        runtime.shutdown().await;
        assert!(!runtime.client_limiters().is_running());
        assert!(!runtime.method_limiters().unwrap().is_running());
    }

    #[tokio::test]
    async fn test_shutdown_without_initialize() {
        SellerRuntime::new().shutdown().await;
    }

    #[test]
    fn test_method_limits_can_be_disabled() {
        let runtime = SellerRuntime::builder().method_limits(false).build().unwrap();
        assert!(runtime.method_limiters().is_none());
        assert!(!runtime.stats().method_limits_enabled);
    }

    #[test]
    fn test_zero_cleanup_interval_is_rejected() {
        let result = SellerRuntime::builder()
            .cleanup_interval(Duration::ZERO)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::OutOfRange {
                field: "cleanup_interval",
                ..
            })
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let runtime = SellerRuntime::new();
        let clone = runtime.clone();
        assert!(Arc::ptr_eq(runtime.sessions(), clone.sessions()));
        assert!(Arc::ptr_eq(runtime.client_limiters(), clone.client_limiters()));
    }
}
