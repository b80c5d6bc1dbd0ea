//! Error types for Seller API calls.
//!
//! This module contains the error taxonomy surfaced by the request executor,
//! the error body shape returned by the API on non-2xx responses, and request
//! validation failures.
//!
//! # Error Handling
//!
//! - [`ApiError`]: A classified API failure (non-2xx response or transport failure)
//! - [`ApiErrorKind`]: The status-derived kind, which decides retry eligibility
//! - [`InvalidRequestError`]: A request rejected before it was sent
//! - [`SellerError`]: Unified error type returned by client calls
//!
//! # Example
//!
//! ```rust,ignore
//! use ozon_seller_api::{SellerError, ApiErrorKind};
//!
//! match client.seller_info().await {
//!     Ok(info) => println!("{:?}", info),
//!     Err(SellerError::Api(e)) if e.kind == ApiErrorKind::Forbidden => {
//!         println!("Check credentials: {}", e.message);
//!     }
//!     Err(SellerError::Api(e)) => println!("API error {}: {}", e.status, e.message),
//!     Err(SellerError::ClientClosed) => println!("client already closed"),
//!     Err(e) => println!("{e}"),
//! }
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::error::ConfigError;

/// Classification of an API failure, derived from the HTTP status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400: malformed request.
    BadRequest,
    /// 403: authentication or permission failure.
    Forbidden,
    /// 404: unknown resource.
    NotFound,
    /// 409: state conflict.
    Conflict,
    /// 429: quota exhausted despite local throttling.
    TooManyRequests,
    /// 5xx: transient vendor-side failure.
    Server,
    /// No response was received (connection, DNS, timeout).
    Transport,
    /// Any other non-2xx status.
    Other,
}

impl ApiErrorKind {
    /// Maps an HTTP status to an error kind.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ozon_seller_api::ApiErrorKind;
    ///
    /// assert_eq!(ApiErrorKind::from_status(404), ApiErrorKind::NotFound);
    /// assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::Server);
    /// assert_eq!(ApiErrorKind::from_status(418), ApiErrorKind::Other);
    /// ```
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            0 => Self::Transport,
            400 => Self::BadRequest,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::TooManyRequests,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }

    /// Returns `true` if the executor retries failures of this kind.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Server)
    }
}

/// One structured detail entry from an error body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    /// Type URL of the detail payload, if provided.
    #[serde(default, rename = "typeUrl", alias = "type_url")]
    pub type_url: Option<String>,
    /// Detail value.
    #[serde(default)]
    pub value: String,
}

/// Error body shape returned by the API: `{code, message, details?}`.
///
/// All fields tolerate absence.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

impl ErrorBody {
    /// Parses an error body, falling back to the raw text as the message.
    pub(crate) fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|_| Self {
            message: raw.to_string(),
            ..Self::default()
        })
    }
}

/// A classified API failure.
///
/// # Example
///
/// ```rust
/// use ozon_seller_api::{ApiError, ApiErrorKind};
///
/// let error = ApiError::from_status(404, 5, "Product not found", vec![]);
/// assert_eq!(error.kind, ApiErrorKind::NotFound);
/// assert!(!error.is_retryable());
/// assert_eq!(error.to_string(), "[404] Product not found (code 5)");
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("[{status}] {message} (code {code})")]
pub struct ApiError {
    /// The error kind.
    pub kind: ApiErrorKind,
    /// The HTTP status, or 0 when no response was received.
    pub status: u16,
    /// Vendor error code from the body.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Structured detail entries.
    pub details: Vec<ErrorDetail>,
}

impl ApiError {
    /// Creates an error whose kind is derived from `status`.
    #[must_use]
    pub fn from_status(
        status: u16,
        code: i64,
        message: impl Into<String>,
        details: Vec<ErrorDetail>,
    ) -> Self {
        Self {
            kind: ApiErrorKind::from_status(status),
            status,
            code,
            message: message.into(),
            details,
        }
    }

    /// Creates a transport failure (status 0).
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::from_status(0, 0, message, Vec::new())
    }

    pub(crate) fn from_body(status: u16, raw: &str) -> Self {
        let body = ErrorBody::parse(raw);
        Self::from_status(status, body.code, body.message, body.details)
    }

    /// Returns `true` if the executor retries this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Error returned when a request fails local validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// The endpoint path is empty.
    #[error("Endpoint path cannot be empty.")]
    EmptyEndpoint,

    /// The request payload could not be serialized.
    #[error("Could not serialize request payload: {reason}")]
    Payload {
        /// Serializer message.
        reason: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header '{name}'. Header names and values must be visible ASCII.")]
    Header {
        /// The header name.
        name: String,
    },

    /// A facade argument violates a documented API constraint.
    #[error("Invalid argument '{field}': {reason}")]
    Argument {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Unified error type for Seller API client operations.
#[derive(Debug, Error)]
pub enum SellerError {
    /// A classified API or transport failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The client instance was closed before the call.
    #[error("Client is closed. Create a new client instance to issue requests.")]
    ClientClosed,

    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A successful response could not be decoded into the expected type.
    #[error("Could not decode response from '{endpoint}': {source}")]
    Decode {
        /// The endpoint that returned the response.
        endpoint: String,
        /// The underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The request failed local validation.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),
}

impl SellerError {
    /// Returns the API error, if this is one.
    #[must_use]
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the API error kind, if this is an API error.
    #[must_use]
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        self.as_api().map(|e| e.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(403), ApiErrorKind::Forbidden);
        assert_eq!(ApiErrorKind::from_status(404), ApiErrorKind::NotFound);
        assert_eq!(ApiErrorKind::from_status(409), ApiErrorKind::Conflict);
        assert_eq!(ApiErrorKind::from_status(429), ApiErrorKind::TooManyRequests);
        assert_eq!(ApiErrorKind::from_status(500), ApiErrorKind::Server);
        assert_eq!(ApiErrorKind::from_status(599), ApiErrorKind::Server);
        assert_eq!(ApiErrorKind::from_status(418), ApiErrorKind::Other);
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Other);
        assert_eq!(ApiErrorKind::from_status(0), ApiErrorKind::Transport);
    }

    #[test]
    fn test_only_server_errors_are_retryable() {
        for status in [0, 400, 403, 404, 409, 418, 429] {
            assert!(!ApiErrorKind::from_status(status).is_retryable(), "{status}");
        }
        assert!(ApiErrorKind::from_status(502).is_retryable());
    }

    #[test]
    fn test_error_body_with_details() {
        let raw = r#"{"code":3,"message":"invalid sku","details":[{"typeUrl":"t","value":"v"},{"value":"w"}]}"#;
        let error = ApiError::from_body(400, raw);

        assert_eq!(error.kind, ApiErrorKind::BadRequest);
        assert_eq!(error.code, 3);
        assert_eq!(error.message, "invalid sku");
        assert_eq!(error.details.len(), 2);
        assert_eq!(error.details[0].type_url.as_deref(), Some("t"));
        assert_eq!(error.details[1].type_url, None);
        assert_eq!(error.details[1].value, "w");
    }

    #[test]
    fn test_error_body_tolerates_missing_fields() {
        let error = ApiError::from_body(409, "{}");
        assert_eq!(error.kind, ApiErrorKind::Conflict);
        assert_eq!(error.code, 0);
        assert!(error.message.is_empty());
        assert!(error.details.is_empty());
    }

    #[test]
    fn test_error_body_not_json_keeps_text() {
        let error = ApiError::from_body(502, "Bad Gateway");
        assert_eq!(error.kind, ApiErrorKind::Server);
        assert_eq!(error.message, "Bad Gateway");
    }

    #[test]
    fn test_transport_error_has_status_zero() {
        let error = ApiError::transport("connection refused");
        assert_eq!(error.status, 0);
        assert_eq!(error.kind, ApiErrorKind::Transport);
        assert!(!error.is_retryable());
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_seller_error_helpers() {
        let error: SellerError = ApiError::from_status(403, 7, "denied", vec![]).into();
        assert_eq!(error.api_kind(), Some(ApiErrorKind::Forbidden));
        assert!(SellerError::ClientClosed.as_api().is_none());
        assert!(SellerError::ClientClosed.to_string().contains("closed"));
    }

    #[test]
    fn test_invalid_request_messages() {
        assert_eq!(
            InvalidRequestError::EmptyEndpoint.to_string(),
            "Endpoint path cannot be empty."
        );
        let error = InvalidRequestError::Argument {
            field: "posting_number",
            reason: "at most 100 values".to_string(),
        };
        assert!(error.to_string().contains("posting_number"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &ApiError::transport("x");
        let _: &dyn std::error::Error = &InvalidRequestError::EmptyEndpoint;
        let _: &dyn std::error::Error = &SellerError::ClientClosed;
    }
}
