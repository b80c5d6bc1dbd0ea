//! Configuration error types for the Ozon Seller API SDK.
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use ozon_seller_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyValue { field: "api_key" })));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A credential or identifier was provided but empty.
    #[error("'{field}' cannot be empty. Please provide a non-empty value.")]
    EmptyValue {
        /// The name of the empty field.
        field: &'static str,
    },

    /// Neither an API key pair nor a bearer token was supplied.
    #[error("No credentials provided. Set client_id and api_key, or an OAuth token.")]
    MissingCredentials,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. The URL must start with http:// or https://.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A numeric setting is outside its allowed range.
    #[error("Invalid value for '{field}': {value}. Expected {expected}.")]
    OutOfRange {
        /// The name of the setting.
        field: &'static str,
        /// The rejected value, rendered as text.
        value: String,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// The maximum retry wait is shorter than the minimum.
    #[error("retry_max_wait ({max}s) must be greater than or equal to retry_min_wait ({min}s).")]
    InvalidRetryWindow {
        /// Configured minimum wait in seconds.
        min: f64,
        /// Configured maximum wait in seconds.
        max: f64,
    },

    /// A rate limit must admit at least one request over a positive interval.
    #[error("Invalid rate limit: {max_requests} requests per {interval_secs}s. Expected at least 1 request over a positive interval.")]
    InvalidRateLimit {
        /// Requested maximum count.
        max_requests: u32,
        /// Requested interval in seconds.
        interval_secs: f64,
    },

    /// An environment or dotenv value could not be parsed.
    #[error("Could not parse '{key}' value '{value}'.")]
    UnparsableValue {
        /// The configuration key.
        key: String,
        /// The raw value.
        value: String,
    },

    /// A dotenv file could not be read.
    #[error("Could not read env file '{path}': {reason}")]
    EnvFile {
        /// Path of the file.
        path: String,
        /// Underlying failure.
        reason: String,
    },
}
