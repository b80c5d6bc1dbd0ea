//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated Ozon seller client identifier (`Client-Id` header).
///
/// # Example
///
/// ```rust
/// use ozon_seller_api::ClientId;
///
/// let id = ClientId::new("123456").unwrap();
/// assert_eq!(id.as_ref(), "123456");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyValue`] if the identifier is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::EmptyValue { field: "client_id" });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated Ozon Seller API key.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ApiKey(*****)` instead of the actual key.
///
/// # Example
///
/// ```rust
/// use ozon_seller_api::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyValue`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyValue { field: "api_key" });
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated OAuth access token.
///
/// A leading `Bearer ` prefix is stripped on construction so the stored value
/// is always the bare token.
///
/// # Example
///
/// ```rust
/// use ozon_seller_api::AccessToken;
///
/// let token = AccessToken::new("Bearer abc123").unwrap();
/// assert_eq!(token.as_ref(), "abc123");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    const BEARER_PREFIX: &'static str = "Bearer ";

    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyValue`] if the token is empty after
    /// removing the `Bearer ` prefix.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        let token = token.trim();
        let token = token.strip_prefix(Self::BEARER_PREFIX).unwrap_or(token).trim();
        if token.is_empty() {
            return Err(ConfigError::EmptyValue { field: "token" });
        }
        Ok(Self(token.to_string()))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A validated API base URL.
///
/// The URL must use the `http` or `https` scheme. Trailing slashes are
/// removed so endpoint paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use ozon_seller_api::BaseUrl;
///
/// let url = BaseUrl::new("https://api-seller.ozon.ru/").unwrap();
/// assert_eq!(url.as_ref(), "https://api-seller.ozon.ru");
///
/// assert!(BaseUrl::new("ftp://api-seller.ozon.ru").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// The production Seller API host.
    pub const DEFAULT: &'static str = "https://api-seller.ozon.ru";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL does not start with
    /// `http://` or `https://`, or has nothing after the scheme.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');

        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() => Ok(Self(trimmed.to_string())),
            _ => Err(ConfigError::InvalidBaseUrl { url }),
        }
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_rejects_empty() {
        assert!(matches!(
            ClientId::new("   "),
            Err(ConfigError::EmptyValue { field: "client_id" })
        ));
    }

    #[test]
    fn test_api_key_debug_is_masked() {
        let key = ApiKey::new("super-secret").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_access_token_strips_bearer_prefix() {
        let token = AccessToken::new("Bearer test_token").unwrap();
        assert_eq!(token.as_ref(), "test_token");

        let plain = AccessToken::new("test_token").unwrap();
        assert_eq!(plain, token);
    }

    #[test]
    fn test_access_token_rejects_bare_prefix() {
        assert!(AccessToken::new("Bearer ").is_err());
    }

    #[test]
    fn test_base_url_accepts_http_and_https() {
        for url in [
            "https://api-seller.ozon.ru",
            "http://localhost:8000",
            "https://test.example.com/api",
        ] {
            assert_eq!(BaseUrl::new(url).unwrap().as_ref(), url);
        }
    }

    #[test]
    fn test_base_url_removes_trailing_slash() {
        let url = BaseUrl::new("https://api-seller.ozon.ru/").unwrap();
        assert_eq!(url.as_ref(), "https://api-seller.ozon.ru");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        for url in ["api-seller.ozon.ru", "ftp://api-seller.ozon.ru", "://invalid-url"] {
            assert!(matches!(
                BaseUrl::new(url),
                Err(ConfigError::InvalidBaseUrl { .. })
            ));
        }
    }

    #[test]
    fn test_base_url_default() {
        assert_eq!(BaseUrl::default().as_ref(), "https://api-seller.ozon.ru");
    }
}
