//! Product barcodes.
//!
//! Both methods are limited by the API to 20 requests per minute per seller
//! account; the limit is enforced locally through method rate limits.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::clients::{SellerClient, SellerError};
use crate::config::ApiVersion;
use crate::limits::MethodRateLimit;
use crate::seller::ensure_batch;

/// Quota applied to `barcode_add`.
pub const BARCODE_ADD_RATE: MethodRateLimit =
    MethodRateLimit::new(20, Duration::from_secs(60), "SellerClient::barcode_add");

/// Quota applied to `barcode_generate`.
pub const BARCODE_GENERATE_RATE: MethodRateLimit = MethodRateLimit::new(
    20,
    Duration::from_secs(60),
    "SellerClient::barcode_generate",
);

/// A barcode to bind to a product.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeBinding {
    /// Barcode value.
    pub barcode: String,
    /// Product SKU.
    pub sku: i64,
}

/// Request of `barcode_add`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeAddRequest {
    /// Barcodes to bind, at most 100.
    pub barcodes: Vec<BarcodeBinding>,
}

/// A barcode that could not be bound.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeAddError {
    /// Barcode value.
    #[serde(default)]
    pub barcode: String,
    /// Error code.
    #[serde(default)]
    pub code: String,
    /// Error description.
    #[serde(default)]
    pub error: String,
    /// Product SKU.
    #[serde(default)]
    pub sku: i64,
}

/// Response of `barcode_add`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeAddResponse {
    /// Failed bindings.
    #[serde(default)]
    pub errors: Vec<BarcodeAddError>,
}

/// Request of `barcode_generate`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeGenerateRequest {
    /// Products to generate barcodes for, at most 100.
    pub product_ids: Vec<i64>,
}

/// A product whose barcode could not be generated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeGenerateError {
    /// Barcode value, if one was produced.
    #[serde(default)]
    pub barcode: String,
    /// Error code.
    #[serde(default)]
    pub code: String,
    /// Error description.
    #[serde(default)]
    pub error: String,
    /// Product identifier.
    #[serde(default)]
    pub product_id: i64,
}

/// Response of `barcode_generate`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeGenerateResponse {
    /// Failed products.
    #[serde(default)]
    pub errors: Vec<BarcodeGenerateError>,
}

impl SellerClient {
    /// Binds barcodes to products.
    ///
    /// `POST /v1/barcode/add`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::InvalidRequest`] for more than 100 barcodes,
    /// or any error from the call.
    pub async fn barcode_add(
        &self,
        request: &BarcodeAddRequest,
    ) -> Result<BarcodeAddResponse, SellerError> {
        ensure_batch("barcodes", request.barcodes.len())?;
        self.post(ApiVersion::V1, "barcode/add")
            .payload(request)
            .method_limit(BARCODE_ADD_RATE)
            .send_as()
            .await
    }

    /// Generates barcodes for products.
    ///
    /// `POST /v1/barcode/generate`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::InvalidRequest`] for more than 100 products,
    /// or any error from the call.
    pub async fn barcode_generate(
        &self,
        request: &BarcodeGenerateRequest,
    ) -> Result<BarcodeGenerateResponse, SellerError> {
        ensure_batch("product_ids", request.product_ids.len())?;
        self.post(ApiVersion::V1, "barcode/generate")
            .payload(request)
            .method_limit(BARCODE_GENERATE_RATE)
            .send_as()
            .await
    }
}
