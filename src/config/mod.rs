//! Configuration types for the Ozon Seller API SDK.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`SellerConfig`]: The validated configuration for one client instance
//! - [`SellerConfigBuilder`]: A builder layering explicit values over
//!   environment variables, a dotenv file and built-in defaults
//! - [`Credentials`]: API-key or bearer-token authentication material
//! - [`ClientId`], [`ApiKey`], [`AccessToken`], [`BaseUrl`]: validated newtypes
//! - [`ApiVersion`]: The per-endpoint version path segment
//!
//! # Precedence
//!
//! Each setting is resolved in this order: explicit builder value, process
//! environment (`OZON_SELLER_*`, case-insensitive), dotenv file, default.
//!
//! # Example
//!
//! ```rust
//! use ozon_seller_api::{SellerConfig, ClientId, ApiKey};
//!
//! let config = SellerConfig::builder()
//!     .client_id(ClientId::new("123456").unwrap())
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .max_requests_per_second(10)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.credential_identity(), "123456");
//! ```

mod env;
mod newtypes;
mod version;

pub use env::ENV_PREFIX;
pub use newtypes::{AccessToken, ApiKey, BaseUrl, ClientId};
pub use version::ApiVersion;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::error::ConfigError;
use env::EnvLayer;

/// Default aggregate request budget per credential identity.
pub const DEFAULT_MAX_REQUESTS_PER_SECOND: u32 = 27;
/// Upper bound accepted for `max_requests_per_second`.
pub const MAX_REQUESTS_PER_SECOND_LIMIT: u32 = 50;
/// Default maximum number of pooled connections per session.
pub const DEFAULT_CONNECTOR_LIMIT: usize = 100;
/// Default number of retries after a server error.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// How a client authenticates against the Seller API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthType {
    /// `Client-Id` + `Api-Key` headers.
    ApiKey,
    /// `Authorization: Bearer <token>` header.
    OAuth,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey => f.write_str("api_key"),
            Self::OAuth => f.write_str("oauth"),
        }
    }
}

/// Authentication material for one seller account.
///
/// A bearer token always takes priority: when both a token and an API key
/// pair are configured the client authenticates with the token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// Key-based authentication.
    ApiKey {
        /// Seller client identifier.
        client_id: ClientId,
        /// Seller API key.
        api_key: ApiKey,
    },
    /// OAuth bearer authentication.
    Bearer {
        /// The access token.
        token: AccessToken,
        /// Optional client identifier, used as the credential identity when set.
        client_id: Option<ClientId>,
    },
}

impl Credentials {
    /// Returns the authentication mode.
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        match self {
            Self::ApiKey { .. } => AuthType::ApiKey,
            Self::Bearer { .. } => AuthType::OAuth,
        }
    }

    /// Returns the string identifying this credential set.
    ///
    /// This is the client id when known. Token-only credentials derive a
    /// stable identity from a SHA-256 digest of the token, prefixed `OAuth-`.
    #[must_use]
    pub fn credential_identity(&self) -> String {
        match self {
            Self::ApiKey { client_id, .. }
            | Self::Bearer {
                client_id: Some(client_id),
                ..
            } => client_id.as_ref().to_string(),
            Self::Bearer {
                token,
                client_id: None,
            } => {
                let digest = Sha256::digest(token.as_ref().as_bytes());
                let hex: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();
                format!("OAuth-{hex}")
            }
        }
    }

    /// Returns the HTTP headers carrying these credentials.
    #[must_use]
    pub fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        match self {
            Self::ApiKey { client_id, api_key } => {
                headers.insert("Client-Id".to_string(), client_id.as_ref().to_string());
                headers.insert("Api-Key".to_string(), api_key.as_ref().to_string());
            }
            Self::Bearer { token, .. } => {
                headers.insert(
                    "Authorization".to_string(),
                    format!("Bearer {}", token.as_ref()),
                );
            }
        }
        headers
    }
}

/// Configuration for one Seller API client instance.
///
/// # Thread Safety
///
/// `SellerConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct SellerConfig {
    credentials: Credentials,
    base_url: BaseUrl,
    max_requests_per_second: u32,
    connector_limit: usize,
    request_timeout: Duration,
    max_retries: u32,
    retry_min_wait: Duration,
    retry_max_wait: Duration,
    cleanup_interval: Duration,
    min_instance_ttl: Duration,
    user_agent_prefix: Option<String>,
}

impl SellerConfig {
    /// Creates a new builder with no sources attached.
    #[must_use]
    pub fn builder() -> SellerConfigBuilder {
        SellerConfigBuilder::new()
    }

    /// Builds a configuration from the process environment and, if present,
    /// a `.env` file in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the `.env` file is unreadable or any
    /// resolved value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let builder = SellerConfigBuilder::new().process_env();
        let builder = if Path::new(".env").is_file() {
            builder.env_file(".env")?
        } else {
            builder
        };
        builder.build()
    }

    /// Returns the credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the credential identity (see [`Credentials::credential_identity`]).
    #[must_use]
    pub fn credential_identity(&self) -> String {
        self.credentials.credential_identity()
    }

    /// Returns the authentication mode.
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        self.credentials.auth_type()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the aggregate request budget per second.
    #[must_use]
    pub const fn max_requests_per_second(&self) -> u32 {
        self.max_requests_per_second
    }

    /// Returns the maximum pooled connections per session.
    #[must_use]
    pub const fn connector_limit(&self) -> usize {
        self.connector_limit
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns how many times a server error is retried.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the lower backoff bound.
    #[must_use]
    pub const fn retry_min_wait(&self) -> Duration {
        self.retry_min_wait
    }

    /// Returns the upper backoff bound.
    #[must_use]
    pub const fn retry_max_wait(&self) -> Duration {
        self.retry_max_wait
    }

    /// Returns the interval between limiter sweeps.
    #[must_use]
    pub const fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    /// Returns the minimum age before an unused limiter may be evicted.
    #[must_use]
    pub const fn min_instance_ttl(&self) -> Duration {
        self.min_instance_ttl
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify SellerConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SellerConfig>();
};

/// Builder for constructing [`SellerConfig`] instances.
///
/// # Defaults
///
/// - `base_url`: `https://api-seller.ozon.ru`
/// - `max_requests_per_second`: 27 (1..=50)
/// - `connector_limit`: 100
/// - `request_timeout`: 30 seconds
/// - `max_retries`: 3 (0..=10)
/// - `retry_min_wait` / `retry_max_wait`: 1 / 5 seconds
/// - `cleanup_interval`, `min_instance_ttl`: 300 seconds
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ozon_seller_api::{SellerConfig, AccessToken};
///
/// let config = SellerConfig::builder()
///     .token(AccessToken::new("Bearer my-token").unwrap())
///     .max_retries(5)
///     .request_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// assert!(config.credential_identity().starts_with("OAuth-"));
/// ```
#[derive(Debug, Default)]
pub struct SellerConfigBuilder {
    client_id: Option<ClientId>,
    api_key: Option<ApiKey>,
    token: Option<AccessToken>,
    base_url: Option<BaseUrl>,
    max_requests_per_second: Option<u32>,
    connector_limit: Option<usize>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_min_wait: Option<Duration>,
    retry_max_wait: Option<Duration>,
    cleanup_interval: Option<Duration>,
    min_instance_ttl: Option<Duration>,
    user_agent_prefix: Option<String>,
    env: EnvLayer,
    file: EnvLayer,
}

impl SellerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seller client id.
    #[must_use]
    pub fn client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets an OAuth access token. Takes priority over an API key pair.
    #[must_use]
    pub fn token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the aggregate request budget per second for this credential identity.
    #[must_use]
    pub const fn max_requests_per_second(mut self, limit: u32) -> Self {
        self.max_requests_per_second = Some(limit);
        self
    }

    /// Sets the maximum pooled connections per session.
    #[must_use]
    pub const fn connector_limit(mut self, limit: usize) -> Self {
        self.connector_limit = Some(limit);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets how many times a server error is retried.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets the lower bound of the exponential backoff.
    #[must_use]
    pub const fn retry_min_wait(mut self, wait: Duration) -> Self {
        self.retry_min_wait = Some(wait);
        self
    }

    /// Sets the upper bound of the exponential backoff.
    #[must_use]
    pub const fn retry_max_wait(mut self, wait: Duration) -> Self {
        self.retry_max_wait = Some(wait);
        self
    }

    /// Sets the interval between background limiter sweeps.
    #[must_use]
    pub const fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = Some(interval);
        self
    }

    /// Sets the minimum age before an unused limiter may be evicted.
    #[must_use]
    pub const fn min_instance_ttl(mut self, ttl: Duration) -> Self {
        self.min_instance_ttl = Some(ttl);
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Uses the given variables as the environment layer.
    ///
    /// Names are matched case-insensitively against the `OZON_SELLER_` prefix.
    #[must_use]
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.env = EnvLayer::from_vars(vars);
        self
    }

    /// Uses the current process environment as the environment layer.
    #[must_use]
    pub fn process_env(self) -> Self {
        self.env_vars(std::env::vars())
    }

    /// Uses a dotenv-style file as the lowest-precedence source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] if the file cannot be read or parsed.
    pub fn env_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        self.file = EnvLayer::from_file(path.as_ref())?;
        Ok(self)
    }

    /// Resolves a value from the environment layer, then the file layer.
    fn layered<T: std::str::FromStr>(&self, field: &str) -> Result<Option<T>, ConfigError> {
        match self.env.parse(field)? {
            Some(value) => Ok(Some(value)),
            None => self.file.parse(field),
        }
    }

    fn layered_str(&self, field: &str) -> Option<String> {
        self.env
            .get(field)
            .or_else(|| self.file.get(field))
            .map(str::to_string)
    }

    fn layered_seconds(&self, field: &'static str) -> Result<Option<Duration>, ConfigError> {
        self.layered::<f64>(field)?
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::OutOfRange {
                    field,
                    value: secs.to_string(),
                    expected: "a non-negative number of seconds",
                })
            })
            .transpose()
    }

    fn resolve_credentials(&self) -> Result<Credentials, ConfigError> {
        let client_id = match &self.client_id {
            Some(id) => Some(id.clone()),
            None => self.layered_str("client_id").map(ClientId::new).transpose()?,
        };
        let api_key = match &self.api_key {
            Some(key) => Some(key.clone()),
            None => self.layered_str("api_key").map(ApiKey::new).transpose()?,
        };
        let token = match &self.token {
            Some(token) => Some(token.clone()),
            None => self.layered_str("token").map(AccessToken::new).transpose()?,
        };

        match (token, client_id, api_key) {
            (Some(token), client_id, _) => Ok(Credentials::Bearer { token, client_id }),
            (None, Some(client_id), Some(api_key)) => Ok(Credentials::ApiKey { client_id, api_key }),
            (None, None, Some(_)) => Err(ConfigError::MissingRequiredField { field: "client_id" }),
            (None, Some(_), None) => Err(ConfigError::MissingRequiredField { field: "api_key" }),
            (None, None, None) => Err(ConfigError::MissingCredentials),
        }
    }

    /// Builds the [`SellerConfig`], resolving every setting through the
    /// source layers and validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if credentials are missing or incomplete, a
    /// layered value cannot be parsed, or a setting is out of range.
    pub fn build(self) -> Result<SellerConfig, ConfigError> {
        let credentials = self.resolve_credentials()?;

        let base_url = match self.base_url.clone() {
            Some(url) => url,
            None => self
                .layered_str("base_url")
                .map(BaseUrl::new)
                .transpose()?
                .unwrap_or_default(),
        };

        let max_requests_per_second = match self.max_requests_per_second {
            Some(value) => value,
            None => self
                .layered("max_requests_per_second")?
                .unwrap_or(DEFAULT_MAX_REQUESTS_PER_SECOND),
        };
        if !(1..=MAX_REQUESTS_PER_SECOND_LIMIT).contains(&max_requests_per_second) {
            return Err(ConfigError::OutOfRange {
                field: "max_requests_per_second",
                value: max_requests_per_second.to_string(),
                expected: "a value between 1 and 50",
            });
        }

        let connector_limit = match self.connector_limit {
            Some(value) => value,
            None => self
                .layered("connector_limit")?
                .unwrap_or(DEFAULT_CONNECTOR_LIMIT),
        };
        if connector_limit == 0 {
            return Err(ConfigError::OutOfRange {
                field: "connector_limit",
                value: connector_limit.to_string(),
                expected: "at least 1",
            });
        }

        let max_retries = match self.max_retries {
            Some(value) => value,
            None => self.layered("max_retries")?.unwrap_or(DEFAULT_MAX_RETRIES),
        };
        if max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::OutOfRange {
                field: "max_retries",
                value: max_retries.to_string(),
                expected: "a value between 0 and 10",
            });
        }

        let request_timeout = match self.request_timeout {
            Some(value) => value,
            None => self
                .layered_seconds("request_timeout")?
                .unwrap_or(Duration::from_secs(30)),
        };
        if request_timeout.is_zero() {
            return Err(ConfigError::OutOfRange {
                field: "request_timeout",
                value: "0".to_string(),
                expected: "a positive number of seconds",
            });
        }

        let retry_min_wait = match self.retry_min_wait {
            Some(value) => value,
            None => self
                .layered_seconds("retry_min_wait")?
                .unwrap_or(Duration::from_secs(1)),
        };
        let retry_max_wait = match self.retry_max_wait {
            Some(value) => value,
            None => self
                .layered_seconds("retry_max_wait")?
                .unwrap_or(Duration::from_secs(5)),
        };
        if retry_max_wait < retry_min_wait {
            return Err(ConfigError::InvalidRetryWindow {
                min: retry_min_wait.as_secs_f64(),
                max: retry_max_wait.as_secs_f64(),
            });
        }

        let cleanup_interval = match self.cleanup_interval {
            Some(value) => value,
            None => self
                .layered_seconds("cleanup_interval")?
                .unwrap_or(Duration::from_secs(300)),
        };
        if cleanup_interval.is_zero() {
            return Err(ConfigError::OutOfRange {
                field: "cleanup_interval",
                value: "0".to_string(),
                expected: "a positive number of seconds",
            });
        }

        let min_instance_ttl = match self.min_instance_ttl {
            Some(value) => value,
            None => self
                .layered_seconds("min_instance_ttl")?
                .unwrap_or(Duration::from_secs(300)),
        };

        Ok(SellerConfig {
            credentials,
            base_url,
            max_requests_per_second,
            connector_limit,
            request_timeout,
            max_retries,
            retry_min_wait,
            retry_max_wait,
            cleanup_interval,
            min_instance_ttl,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
