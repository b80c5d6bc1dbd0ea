//! Pooled HTTP sessions, one per credential identity.
//!
//! A session is created lazily on first use and closed the moment the last
//! caller using it releases its [`SessionGuard`]. Releasing happens in
//! `Drop`, so a cancelled or failed call still gives its reference back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::clients::errors::{ApiError, InvalidRequestError, SellerError};

/// One live HTTP session bound to a credential identity.
#[derive(Debug)]
pub struct PooledSession {
    identity: String,
    client: reqwest::Client,
    connections: Semaphore,
    connector_limit: usize,
    created_at: Instant,
    closed: AtomicBool,
}

impl PooledSession {
    /// The underlying HTTP client.
    #[must_use]
    pub const fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// The credential identity this session serves.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// When the session was created.
    #[must_use]
    pub const fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Waits for one of the session's connection slots.
    ///
    /// At most `connector_limit` requests are in flight on a session at any
    /// moment; the permit must be held until the response body is read.
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::Api`] with a transport error if the slot
    /// semaphore has been closed.
    pub async fn connection(&self) -> Result<SemaphorePermit<'_>, SellerError> {
        self.connections
            .acquire()
            .await
            .map_err(|_| ApiError::transport("connection slots closed").into())
    }

    /// The maximum number of concurrent requests on this session.
    #[must_use]
    pub const fn connector_limit(&self) -> usize {
        self.connector_limit
    }

    /// Connection slots currently free.
    #[must_use]
    pub fn available_connections(&self) -> usize {
        self.connections.available_permits()
    }

    /// Returns `true` once the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(identity = self.identity.as_str(), "Closed HTTP session");
        }
    }
}

/// Transport settings applied when a session is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum concurrent requests, also the idle connections kept per host.
    pub connector_limit: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connector_limit: 100,
        }
    }
}

#[derive(Debug)]
struct PoolEntry {
    session: Arc<PooledSession>,
    // instance id -> number of outstanding guards
    active: HashMap<u64, usize>,
}

/// Scoped use of a pooled session. Dropping it releases the reference.
#[derive(Debug)]
pub struct SessionGuard<'a> {
    pool: &'a SessionPool,
    session: Arc<PooledSession>,
    instance_id: u64,
}

impl SessionGuard<'_> {
    /// The session held by this guard.
    #[must_use]
    pub const fn session(&self) -> &Arc<PooledSession> {
        &self.session
    }
}

impl std::ops::Deref for SessionGuard<'_> {
    type Target = PooledSession;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.pool.release(&self.session, self.instance_id);
    }
}

/// Process-wide pool of HTTP sessions keyed by credential identity.
///
/// All map mutations happen under one lock; requests themselves are sent
/// outside it.
#[derive(Debug, Default)]
pub struct SessionPool {
    sessions: Mutex<HashMap<String, PoolEntry>>,
}

impl SessionPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PoolEntry>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns the session for `identity`, creating it with `headers` and
    /// `settings` if none exists, and records `instance_id` as an active user.
    ///
    /// An existing session is reused as-is; `headers` and `settings` only
    /// apply at creation.
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::InvalidRequest`] if a header is not a valid
    /// HTTP header, or [`SellerError::Api`] with a transport error if the
    /// HTTP client cannot be built.
    pub fn acquire(
        &self,
        identity: &str,
        headers: &HashMap<String, String>,
        settings: SessionSettings,
        instance_id: u64,
    ) -> Result<SessionGuard<'_>, SellerError> {
        let mut sessions = self.lock();

        let entry = match sessions.entry(identity.to_string()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(slot) => {
                let session = Self::create_session(identity, headers, settings)?;
                slot.insert(PoolEntry {
                    session: Arc::new(session),
                    active: HashMap::new(),
                })
            }
        };
        *entry.active.entry(instance_id).or_insert(0) += 1;

        Ok(SessionGuard {
            pool: self,
            session: Arc::clone(&entry.session),
            instance_id,
        })
    }

    fn create_session(
        identity: &str,
        headers: &HashMap<String, String>,
        settings: SessionSettings,
    ) -> Result<PooledSession, SellerError> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let invalid = || InvalidRequestError::Header { name: name.clone() };
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            header_map.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(header_map)
            .timeout(settings.timeout)
            .pool_max_idle_per_host(settings.connector_limit)
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?;

        tracing::debug!(
            identity,
            timeout_secs = settings.timeout.as_secs_f64(),
            connector_limit = settings.connector_limit,
            "Created HTTP session"
        );

        Ok(PooledSession {
            identity: identity.to_string(),
            client,
            connections: Semaphore::new(settings.connector_limit.min(Semaphore::MAX_PERMITS)),
            connector_limit: settings.connector_limit,
            created_at: Instant::now(),
            closed: AtomicBool::new(false),
        })
    }

    fn release(&self, session: &Arc<PooledSession>, instance_id: u64) {
        let mut sessions = self.lock();
        let Some(entry) = sessions.get_mut(session.identity()) else {
            return;
        };
        // The entry may belong to a newer session after a force close.
        if !Arc::ptr_eq(&entry.session, session) {
            return;
        }
        if let Some(count) = entry.active.get_mut(&instance_id) {
            *count -= 1;
            if *count == 0 {
                entry.active.remove(&instance_id);
            }
        }
        if entry.active.is_empty() {
            if let Some(entry) = sessions.remove(session.identity()) {
                entry.session.close();
            }
        }
    }

    /// Closes and removes the session for `identity` regardless of active
    /// users. No-op if absent.
    pub fn force_close(&self, identity: &str) {
        if let Some(entry) = self.lock().remove(identity) {
            entry.session.close();
        }
    }

    /// Removes every reference held by `instance_id` and closes sessions
    /// left without users.
    pub fn release_instance(&self, identity: &str, instance_id: u64) {
        let mut sessions = self.lock();
        let emptied = sessions.get_mut(identity).is_some_and(|entry| {
            entry.active.remove(&instance_id);
            entry.active.is_empty()
        });
        if emptied {
            if let Some(entry) = sessions.remove(identity) {
                entry.session.close();
            }
        }
    }

    /// Force-closes every session.
    pub fn close_all(&self) {
        let drained: Vec<PoolEntry> = self.lock().drain().map(|(_, entry)| entry).collect();
        let count = drained.len();
        for entry in drained {
            entry.session.close();
        }
        if count > 0 {
            tracing::debug!(count, "Closed all HTTP sessions");
        }
    }

    /// Number of open sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if `identity` has an open session.
    #[must_use]
    pub fn has_session(&self, identity: &str) -> bool {
        self.lock().contains_key(identity)
    }

    /// Number of distinct instances currently using the session for `identity`.
    #[must_use]
    pub fn active_instances(&self, identity: &str) -> usize {
        self.lock().get(identity).map_or(0, |entry| entry.active.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> SessionPool {
        SessionPool::new()
    }

    fn settings() -> SessionSettings {
        SessionSettings {
            timeout: Duration::from_secs(5),
            connector_limit: 10,
        }
    }

    fn headers() -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Client-Id".to_string(), "client".to_string());
        headers.insert("Api-Key".to_string(), "key".to_string());
        headers
    }

    #[test]
    fn test_same_identity_reuses_session() {
        let pool = pool();
        let first = pool.acquire("client", &headers(), settings(), 1).unwrap();
        let second = pool.acquire("client", &HashMap::new(), settings(), 2).unwrap();

        assert!(Arc::ptr_eq(first.session(), second.session()));
        assert_eq!(pool.session_count(), 1);
        assert_eq!(pool.active_instances("client"), 2);
    }

    #[test]
    fn test_session_closes_only_after_last_release() {
        let pool = pool();
        let first = pool.acquire("client", &headers(), settings(), 1).unwrap();
        let second = pool.acquire("client", &headers(), settings(), 2).unwrap();
        let session = Arc::clone(first.session());

        drop(first);
        assert!(!session.is_closed());
        assert!(pool.has_session("client"));

        drop(second);
        assert!(session.is_closed());
        assert!(!pool.has_session("client"));
    }

    #[test]
    fn test_same_instance_concurrent_guards() {
        let pool = pool();
        let a = pool.acquire("client", &headers(), settings(), 1).unwrap();
        let b = pool.acquire("client", &headers(), settings(), 1).unwrap();
        drop(a);
        assert!(pool.has_session("client"));
        assert!(!b.is_closed());
        drop(b);
        assert!(!pool.has_session("client"));
    }

    #[test]
    fn test_different_identities_get_different_sessions() {
        let pool = pool();
        let a = pool.acquire("first", &headers(), settings(), 1).unwrap();
        let b = pool.acquire("second", &headers(), settings(), 2).unwrap();
        assert!(!Arc::ptr_eq(a.session(), b.session()));
        assert_eq!(pool.session_count(), 2);
    }

    #[test]
    fn test_force_close_is_idempotent() {
        let pool = pool();
        let guard = pool.acquire("client", &headers(), settings(), 1).unwrap();
        pool.force_close("client");
        assert!(guard.is_closed());
        pool.force_close("client");
        pool.force_close("never-seen");

        // A new session created after the force close survives the old guard.
        let fresh = pool.acquire("client", &headers(), settings(), 2).unwrap();
        drop(guard);
        assert!(pool.has_session("client"));
        assert!(!fresh.is_closed());
    }

    #[tokio::test]
    async fn test_connection_slots_are_bounded() {
        let pool = pool();
        let settings = SessionSettings {
            timeout: Duration::from_secs(5),
            connector_limit: 2,
        };
        let guard = pool.acquire("client", &headers(), settings, 1).unwrap();
        assert_eq!(guard.connector_limit(), 2);

        let first = guard.connection().await.unwrap();
        let _second = guard.connection().await.unwrap();
        assert_eq!(guard.available_connections(), 0);

        let third = tokio::time::timeout(Duration::from_millis(50), guard.connection()).await;
        assert!(third.is_err());

        drop(first);
        assert_eq!(guard.available_connections(), 1);
        let _third = guard.connection().await.unwrap();
    }

    #[test]
    fn test_close_all() {
        let pool = pool();
        let a = pool.acquire("first", &headers(), settings(), 1).unwrap();
        let b = pool.acquire("second", &headers(), settings(), 2).unwrap();
        pool.close_all();
        assert_eq!(pool.session_count(), 0);
        assert!(a.is_closed());
        assert!(b.is_closed());
    }

    #[test]
    fn test_release_instance_drops_all_its_references() {
        let pool = pool();
        let _a = pool.acquire("client", &headers(), settings(), 1).unwrap();
        let _b = pool.acquire("client", &headers(), settings(), 1).unwrap();
        pool.release_instance("client", 1);
        assert!(!pool.has_session("client"));
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let pool = pool();
        let mut bad = HashMap::new();
        bad.insert("Api-Key".to_string(), "line\nbreak".to_string());
        let result = pool.acquire("client", &bad, settings(), 1);
        assert!(matches!(
            result,
            Err(SellerError::InvalidRequest(InvalidRequestError::Header { .. }))
        ));
        assert_eq!(pool.session_count(), 0);
    }
}
