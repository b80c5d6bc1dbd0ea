//! The Seller API client and request executor.
//!
//! This module provides [`SellerClient`], the handle through which every
//! API call is issued. Each call passes through the client-wide limiter,
//! the optional per-method limiter and a pooled session before it reaches
//! the network, and server errors are retried with exponential backoff.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::clients::errors::{ApiError, SellerError};
use crate::clients::http_request::{ApiRequest, HttpMethod, RequestSpec};
use crate::clients::session_pool::SessionSettings;
use crate::config::{ApiVersion, AuthType, SellerConfig};
use crate::limits::{InstanceHandle, RateLimiter};
use crate::runtime::SellerRuntime;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Computes the wait before retry number `attempt` (1-based).
///
/// The wait starts at `min` and doubles on every attempt, never exceeding
/// `max`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ozon_seller_api::clients::backoff_delay;
///
/// let min = Duration::from_secs(1);
/// let max = Duration::from_secs(5);
/// assert_eq!(backoff_delay(min, max, 1), Duration::from_secs(1));
/// assert_eq!(backoff_delay(min, max, 3), Duration::from_secs(4));
/// assert_eq!(backoff_delay(min, max, 4), Duration::from_secs(5));
/// ```
#[must_use]
pub fn backoff_delay(min: Duration, max: Duration, attempt: u32) -> Duration {
    let exponent = i32::try_from(attempt.saturating_sub(1).min(30)).unwrap_or(30);
    let secs = min.as_secs_f64() * 2f64.powi(exponent);
    Duration::from_secs_f64(secs.min(max.as_secs_f64())).max(min)
}

/// A client instance bound to one set of credentials.
///
/// Instances sharing a credential identity share one aggregate rate limiter
/// and one pooled HTTP session through the [`SellerRuntime`] they were
/// created with.
///
/// # Thread Safety
///
/// `SellerClient` is `Send + Sync`; wrap it in an `Arc` to issue calls from
/// several tasks.
///
/// # Example
///
/// ```rust,ignore
/// use ozon_seller_api::{SellerClient, SellerConfig, SellerRuntime, ClientId, ApiKey};
///
/// let runtime = SellerRuntime::new();
/// runtime.initialize();
///
/// let config = SellerConfig::builder()
///     .client_id(ClientId::new("123456")?)
///     .api_key(ApiKey::new("api-key")?)
///     .build()?;
/// let client = SellerClient::new(&runtime, config)?;
///
/// let warehouses = client.warehouse_list().await?;
/// client.close();
/// ```
#[derive(Debug)]
pub struct SellerClient {
    id: u64,
    config: SellerConfig,
    identity: String,
    default_headers: HashMap<String, String>,
    runtime: SellerRuntime,
    handle: Mutex<Option<Arc<InstanceHandle>>>,
    closed: AtomicBool,
}

// Verify SellerClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SellerClient>();
};

impl SellerClient {
    /// Creates a client instance and registers it with the runtime's
    /// client limiter registry.
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::Config`] if the configured request rate
    /// cannot form a limiter.
    pub fn new(runtime: &SellerRuntime, config: SellerConfig) -> Result<Self, SellerError> {
        let id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
        let identity = config.credential_identity();
        let handle = InstanceHandle::new(id, identity.clone());
        runtime
            .client_limiters()
            .get_or_register(&handle, config.max_requests_per_second())?;

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Ozon Seller API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = config.credentials().headers();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        tracing::debug!(
            instance_id = id,
            identity = identity.as_str(),
            auth_type = %config.auth_type(),
            "Created seller client"
        );

        Ok(Self {
            id,
            config,
            identity,
            default_headers,
            runtime: runtime.clone(),
            handle: Mutex::new(Some(handle)),
            closed: AtomicBool::new(false),
        })
    }

    /// The unique id of this instance.
    #[must_use]
    pub const fn instance_id(&self) -> u64 {
        self.id
    }

    /// The credential identity shared with other instances using the same
    /// credentials.
    #[must_use]
    pub fn credential_identity(&self) -> &str {
        &self.identity
    }

    /// The authentication mode.
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        self.config.auth_type()
    }

    /// The configuration this instance was built with.
    #[must_use]
    pub const fn config(&self) -> &SellerConfig {
        &self.config
    }

    /// The runtime this instance belongs to.
    #[must_use]
    pub const fn runtime(&self) -> &SellerRuntime {
        &self.runtime
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Closes the instance. Idempotent.
    ///
    /// Subsequent calls fail with [`SellerError::ClientClosed`]. The instance
    /// stops counting as a live dependent of its client limiter, and its
    /// session references are released.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            self.runtime.client_limiters().unregister(&handle);
        }
        self.runtime
            .sessions()
            .release_instance(&self.identity, self.id);
        tracing::info!(
            instance_id = self.id,
            identity = self.identity.as_str(),
            "Seller client closed"
        );
    }

    /// Starts building a request.
    pub fn request(
        &self,
        method: HttpMethod,
        version: ApiVersion,
        endpoint: impl Into<String>,
    ) -> ApiRequest<'_> {
        ApiRequest::new(self, method, version, endpoint)
    }

    /// Starts building a `POST` request.
    pub fn post(&self, version: ApiVersion, endpoint: impl Into<String>) -> ApiRequest<'_> {
        self.request(HttpMethod::Post, version, endpoint)
    }

    fn live_handle(&self) -> Result<Arc<InstanceHandle>, SellerError> {
        if self.is_closed() {
            return Err(SellerError::ClientClosed);
        }
        let guard = match self.handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.as_ref().map(Arc::clone).ok_or(SellerError::ClientClosed)
    }

    /// Runs one logical call: admission, transport, classification and
    /// retry of server errors.
    pub(crate) async fn execute(&self, spec: RequestSpec) -> Result<serde_json::Value, SellerError> {
        let handle = self.live_handle()?;
        let client_limiter = self
            .runtime
            .client_limiters()
            .get_or_register(&handle, self.config.max_requests_per_second())?;

        let path = spec.path();
        let url = format!("{}/{}", self.config.base_url(), path);
        let max_attempts = self.config.max_retries().saturating_add(1);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            if self.is_closed() {
                return Err(SellerError::ClientClosed);
            }

            match self.attempt(&spec, &url, &client_limiter).await {
                Ok(body) => return Ok(body),
                Err(SellerError::Api(error)) if error.is_retryable() && attempt < max_attempts => {
                    let delay = backoff_delay(
                        self.config.retry_min_wait(),
                        self.config.retry_max_wait(),
                        attempt,
                    );
                    tracing::warn!(
                        endpoint = path.as_str(),
                        status = error.status,
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Server error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn attempt(
        &self,
        spec: &RequestSpec,
        url: &str,
        client_limiter: &RateLimiter,
    ) -> Result<serde_json::Value, SellerError> {
        client_limiter.acquire().await;

        // Held for the whole attempt so the sweep sees the limiter in use.
        let _method_limiter = match &spec.method_limit {
            Some(limit) => match self.runtime.method_limiters() {
                Some(registry) => {
                    let limiter = registry.get_limiter(&self.identity, limit)?;
                    limiter.acquire().await;
                    Some(limiter)
                }
                None => {
                    tracing::warn!(
                        method = limit.method_identifier,
                        "No method rate limiter registry, calling without method throttling"
                    );
                    None
                }
            },
            None => None,
        };

        let settings = SessionSettings {
            timeout: self.config.request_timeout(),
            connector_limit: self.config.connector_limit(),
        };
        let session =
            self.runtime
                .sessions()
                .acquire(&self.identity, &self.default_headers, settings, self.id)?;

        let mut builder = session.http().request(spec.method.into(), url);
        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }
        if let Some(payload) = &spec.payload {
            builder = builder.json(payload);
        }

        let connection = session.connection().await?;
        tracing::debug!(method = %spec.method, url, "Sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        drop(connection);

        if !(200..300).contains(&status) {
            return Err(ApiError::from_body(status, &text).into());
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&text).map_err(|source| SellerError::Decode {
            endpoint: spec.path(),
            source,
        })
    }
}
