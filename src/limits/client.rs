//! Per-credential aggregate rate limiting.
//!
//! Every client instance sharing a credential identity draws from one
//! limiter. The registry tracks live instances through weak handles so an
//! entry can be evicted once nothing depends on it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

use crate::error::ConfigError;
use crate::limits::bucket::{RateLimitConfig, RateLimiter};
use crate::limits::sweeper::{Sweep, Sweeper};

/// Liveness handle owned by a client instance.
///
/// Registries hold only [`Weak`] references to it, so dropping the last
/// `Arc` is what marks the instance as gone.
#[derive(Debug)]
pub struct InstanceHandle {
    id: u64,
    identity: String,
}

impl InstanceHandle {
    /// Creates a handle for the given instance id and credential identity.
    #[must_use]
    pub fn new(id: u64, identity: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            identity: identity.into(),
        })
    }

    /// The instance id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The credential identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

#[derive(Debug)]
struct ClientEntry {
    limiter: Arc<RateLimiter>,
    created_at: Instant,
    instances: HashMap<u64, Weak<InstanceHandle>>,
}

impl ClientEntry {
    fn purge_dead(&mut self) {
        self.instances.retain(|_, handle| handle.strong_count() > 0);
    }
}

/// Snapshot of one client limiter entry.
#[derive(Clone, Debug)]
pub struct ClientLimiterStats {
    /// The limiter configuration.
    pub config: RateLimitConfig,
    /// Number of live instances depending on the entry.
    pub live_references: usize,
    /// When the entry was created.
    pub created_at: Instant,
    /// When the limiter last admitted a request.
    pub last_used: Instant,
}

/// Registry of aggregate limiters keyed by credential identity.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ozon_seller_api::{ClientRateLimiterRegistry, InstanceHandle};
///
/// let registry = ClientRateLimiterRegistry::new(Duration::from_secs(300), Duration::from_secs(300));
/// let a = InstanceHandle::new(1, "123456");
/// let b = InstanceHandle::new(2, "123456");
///
/// let first = registry.get_or_register(&a, 27).unwrap();
/// let second = registry.get_or_register(&b, 10).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(second.config().max_requests(), 27);
/// ```
#[derive(Debug)]
pub struct ClientRateLimiterRegistry {
    entries: Mutex<HashMap<String, ClientEntry>>,
    cleanup_interval: Duration,
    min_instance_ttl: Duration,
    sweeper: Sweeper,
}

impl ClientRateLimiterRegistry {
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

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ClientEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns the shared limiter for the instance's credential identity,
    /// registering the instance as a live dependent.
    ///
    /// The first registration for an identity fixes the limiter's rate;
    /// later instances with a different `requests_per_second` reuse it
    /// unchanged. Registering the same instance twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if a new entry would be
    /// created with `requests_per_second == 0`.
    pub fn get_or_register(
        &self,
        instance: &Arc<InstanceHandle>,
        requests_per_second: u32,
    ) -> Result<Arc<RateLimiter>, ConfigError> {
        let mut entries = self.lock();

        if let Some(entry) = entries.get_mut(instance.identity()) {
            entry
                .instances
                .entry(instance.id())
                .or_insert_with(|| Arc::downgrade(instance));
            return Ok(Arc::clone(&entry.limiter));
        }

        let config = RateLimitConfig::per_second(requests_per_second)?;
        let limiter = Arc::new(RateLimiter::new(config)?);
        let mut instances = HashMap::new();
        instances.insert(instance.id(), Arc::downgrade(instance));
        entries.insert(
            instance.identity().to_string(),
            ClientEntry {
                limiter: Arc::clone(&limiter),
                created_at: Instant::now(),
                instances,
            },
        );
        tracing::debug!(
            identity = instance.identity(),
            requests_per_second,
            "Registered client rate limiter"
        );
        Ok(limiter)
    }

    /// Stops tracking an instance. The entry itself stays until swept.
    pub fn unregister(&self, instance: &InstanceHandle) {
        if let Some(entry) = self.lock().get_mut(instance.identity()) {
            entry.instances.remove(&instance.id());
        }
    }

    /// Drops dead instance references and evicts entries that have no live
    /// instances and are older than the minimum TTL.
    ///
    /// Returns the number of evicted entries.
    pub fn sweep(&self) -> usize {
        let ttl = self.min_instance_ttl;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|identity, entry| {
            entry.purge_dead();
            let keep = !entry.instances.is_empty() || entry.created_at.elapsed() < ttl;
            if !keep {
                tracing::debug!(identity = identity.as_str(), "Evicting client rate limiter");
            }
            keep
        });
        before - entries.len()
    }

    /// Returns `true` if the identity has an entry.
    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.lock().contains_key(identity)
    }

    /// Identities with at least one live instance.
    #[must_use]
    pub fn active_identities(&self) -> Vec<String> {
        let mut identities: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, entry)| entry.instances.values().any(|h| h.strong_count() > 0))
            .map(|(identity, _)| identity.clone())
            .collect();
        identities.sort();
        identities
    }

    /// Per-identity snapshot of every entry.
    #[must_use]
    pub fn stats(&self) -> HashMap<String, ClientLimiterStats> {
        self.lock()
            .iter()
            .map(|(identity, entry)| {
                let stats = ClientLimiterStats {
                    config: entry.limiter.config(),
                    live_references: entry
                        .instances
                        .values()
                        .filter(|h| h.strong_count() > 0)
                        .count(),
                    created_at: entry.created_at,
                    last_used: entry.limiter.last_used(),
                };
                (identity.clone(), stats)
            })
            .collect()
    }

    /// Starts the periodic sweep at the configured cleanup interval.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(self: &Arc<Self>) {
        self.sweeper
            .start(Arc::downgrade(self), self.cleanup_interval, "client");
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

impl Sweep for ClientRateLimiterRegistry {
    fn evict_idle(&self) -> usize {
        self.sweep()
    }
}
