//! # Ozon Seller API Rust SDK
//!
//! An async client for the Ozon Seller API with built-in request governance:
//! connection pooling, per-account and per-method rate limiting, and retries
//! of transient server errors.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`SellerConfig`] and [`SellerConfigBuilder`],
//!   layered over `OZON_SELLER_*` environment variables and dotenv files
//! - API-key (`Client-Id` + `Api-Key`) and OAuth bearer authentication
//! - One pooled HTTP session per credential identity, shared by every client
//!   instance using the same credentials
//! - An aggregate request budget per credential identity
//!   ([`ClientRateLimiterRegistry`]) and optional per-method quotas
//!   ([`MethodRateLimiterRegistry`])
//! - Exponential backoff retries for 5xx responses
//! - Typed methods for a subset of the Seller API in [`seller`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ozon_seller_api::{ApiKey, ClientId, SellerConfig};
//!
//! let config = SellerConfig::builder()
//!     .client_id(ClientId::new("123456").unwrap())
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_requests_per_second(), 27);
//! ```
//!
//! ## Making API Requests
//!
//! All governance state lives in a [`SellerRuntime`]. Create one per process
//! and share it between clients:
//!
//! ```rust,ignore
//! use ozon_seller_api::{SellerClient, SellerConfig, SellerRuntime};
//!
//! let runtime = SellerRuntime::new();
//! runtime.initialize();
//!
//! let client = SellerClient::new(&runtime, SellerConfig::from_env()?)?;
//!
//! // Typed facade method
//! let warehouses = client.warehouse_list().await?;
//!
//! // Raw call to any endpoint
//! let body = client
//!     .post(ozon_seller_api::ApiVersion::V1, "warehouse/list")
//!     .payload(&serde_json::json!({}))
//!     .send()
//!     .await?;
//!
//! client.close();
//! runtime.shutdown().await;
//! ```
//!
//! ## Error Handling
//!
//! Calls return [`SellerError`]. HTTP failures are carried as [`ApiError`],
//! classified by [`ApiErrorKind`]:
//!
//! ```rust
//! use ozon_seller_api::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::from_status(404, 5, "posting not found", Vec::new());
//! assert_eq!(error.kind, ApiErrorKind::NotFound);
//! assert!(!error.is_retryable());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Shared state is owned by an explicit [`SellerRuntime`]
//! - **Fail-fast validation**: Configuration and newtypes validate on construction
//! - **Thread-safe**: All public types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod limits;
mod runtime;
pub mod seller;

// Re-export public types at crate root for convenience
pub use config::{
    AccessToken, ApiKey, ApiVersion, AuthType, BaseUrl, ClientId, Credentials, SellerConfig,
    SellerConfigBuilder,
};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    ApiError, ApiErrorKind, ApiRequest, ErrorDetail, HttpMethod, InvalidRequestError,
    SellerClient, SellerError, SessionPool,
};

// Re-export governance types
pub use limits::{
    ClientRateLimiterRegistry, InstanceHandle, MethodRateLimit, MethodRateLimiterRegistry,
    RateLimitConfig, RateLimiter,
};
pub use runtime::{
    RuntimeStats, SellerRuntime, SellerRuntimeBuilder, DEFAULT_CLEANUP_INTERVAL,
    DEFAULT_MIN_INSTANCE_TTL,
};
