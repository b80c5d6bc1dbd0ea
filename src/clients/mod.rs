//! HTTP client types for Seller API communication.
//!
//! This module provides the client layer: the [`SellerClient`] through which
//! calls are issued, the request builder, the shared session pool and the
//! error taxonomy.
//!
//! # Overview
//!
//! - [`SellerClient`]: A client instance bound to one set of credentials
//! - [`ApiRequest`]: Builder for one API call
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`SessionPool`]: One pooled HTTP session per credential identity
//! - [`ApiError`], [`ApiErrorKind`], [`SellerError`]: Error types
//!
//! # Retry Behavior
//!
//! - **5xx (Server Error)**: Retried up to `max_retries` times with
//!   exponential backoff between `retry_min_wait` and `retry_max_wait`
//! - **429 (Too Many Requests)**: Returned immediately; local limiters are
//!   expected to prevent it
//! - **Other statuses and transport failures**: Returned immediately
//!
//! Limiters and the pooled session are re-acquired on every attempt.

mod errors;
mod http_request;
mod seller_client;
mod session_pool;

pub use errors::{ApiError, ApiErrorKind, ErrorDetail, InvalidRequestError, SellerError};
pub use http_request::{ApiRequest, HttpMethod};
pub use seller_client::{backoff_delay, SellerClient, SDK_VERSION};
pub use session_pool::{PooledSession, SessionGuard, SessionPool, SessionSettings};
