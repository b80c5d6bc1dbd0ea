//! Request types for the Seller API.
//!
//! This module provides [`ApiRequest`], a builder for one API call issued
//! through a [`SellerClient`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::errors::{InvalidRequestError, SellerError};
use crate::clients::seller_client::SellerClient;
use crate::config::ApiVersion;
use crate::limits::MethodRateLimit;

/// HTTP methods supported by the client.
///
/// Every documented Seller API endpoint uses `POST`; the others exist for
/// completeness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP POST method.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A fully described API call, as handed to the executor.
#[derive(Clone, Debug)]
pub(crate) struct RequestSpec {
    pub method: HttpMethod,
    pub version: ApiVersion,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub payload: Option<serde_json::Value>,
    pub method_limit: Option<MethodRateLimit>,
}

impl RequestSpec {
    /// Path relative to the base URL, e.g. `v3/posting/fbs/get`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.version, self.endpoint)
    }
}

/// Builder for one API call.
///
/// Obtain one from [`SellerClient::request`].
///
/// # Example
///
/// ```rust,ignore
/// use ozon_seller_api::{ApiVersion, HttpMethod};
/// use serde_json::json;
///
/// let body = client
///     .request(HttpMethod::Post, ApiVersion::V3, "posting/fbs/get")
///     .payload(&json!({"posting_number": "12345-0001-1"}))
///     .send()
///     .await?;
/// ```
#[derive(Debug)]
#[must_use = "requests do nothing unless sent"]
pub struct ApiRequest<'a> {
    client: &'a SellerClient,
    method: HttpMethod,
    version: ApiVersion,
    endpoint: String,
    query: Vec<(String, String)>,
    payload: Option<Result<serde_json::Value, InvalidRequestError>>,
    method_limit: Option<MethodRateLimit>,
}

impl<'a> ApiRequest<'a> {
    pub(crate) fn new(
        client: &'a SellerClient,
        method: HttpMethod,
        version: ApiVersion,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            method,
            version,
            endpoint: endpoint.into(),
            query: Vec::new(),
            payload: None,
            method_limit: None,
        }
    }

    /// Appends query string parameters. Repeated keys are sent in order.
    pub fn query<K, V>(mut self, params: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: ToString,
    {
        self.query.extend(
            params
                .iter()
                .map(|(key, value)| (key.as_ref().to_string(), value.to_string())),
        );
        self
    }

    /// Sets the JSON body.
    ///
    /// Serialization failures surface from [`send`](Self::send).
    pub fn payload<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.payload = Some(serde_json::to_value(body).map_err(|e| {
            InvalidRequestError::Payload {
                reason: e.to_string(),
            }
        }));
        self
    }

    /// Applies a per-method quota on top of the client-wide limit.
    pub const fn method_limit(mut self, limit: MethodRateLimit) -> Self {
        self.method_limit = Some(limit);
        self
    }

    fn into_spec(self) -> Result<(&'a SellerClient, RequestSpec), SellerError> {
        let endpoint = self.endpoint.trim().trim_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(InvalidRequestError::EmptyEndpoint.into());
        }
        let payload = self.payload.transpose()?;
        Ok((
            self.client,
            RequestSpec {
                method: self.method,
                version: self.version,
                endpoint,
                query: self.query,
                payload,
                method_limit: self.method_limit,
            },
        ))
    }

    /// Sends the request and returns the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the request fails validation, the client
    /// is closed, or the API call fails after retries.
    pub async fn send(self) -> Result<serde_json::Value, SellerError> {
        let (client, spec) = self.into_spec()?;
        client.execute(spec).await
    }

    /// Sends the request and decodes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::Decode`] if the body does not match `T`, or
    /// any error from [`send`](Self::send).
    pub async fn send_as<T: DeserializeOwned>(self) -> Result<T, SellerError> {
        let (client, spec) = self.into_spec()?;
        let endpoint = spec.path();
        let value = client.execute(spec).await?;
        serde_json::from_value(value).map_err(|source| SellerError::Decode { endpoint, source })
    }
}
