//! Product catalogue: listing, limits and archiving.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::clients::{SellerClient, SellerError};
use crate::config::ApiVersion;
use crate::limits::MethodRateLimit;
use crate::seller::common::{BoolResult, EmptyRequest};
use crate::seller::ensure_batch;

/// Quota applied to `product_info_limit`.
pub const PRODUCT_INFO_LIMIT_RATE: MethodRateLimit = MethodRateLimit::new(
    10,
    Duration::from_secs(1),
    "SellerClient::product_info_limit",
);

/// Quota applied to `product_list`.
pub const PRODUCT_LIST_RATE: MethodRateLimit =
    MethodRateLimit::new(10, Duration::from_secs(1), "SellerClient::product_list");

/// One quota counter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitUsage {
    /// How many operations are allowed. `-1` means unlimited.
    #[serde(default)]
    pub limit: i64,
    /// How many were used.
    #[serde(default)]
    pub usage: i64,
    /// When the counter resets, for daily quotas.
    #[serde(default)]
    pub reset_at: Option<DateTime<Utc>>,
}

/// Response of `product_info_limit`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfoLimitResponse {
    /// Daily product creation quota.
    #[serde(default)]
    pub daily_create: LimitUsage,
    /// Daily product update quota.
    #[serde(default)]
    pub daily_update: LimitUsage,
    /// Total assortment quota.
    #[serde(default)]
    pub total: LimitUsage,
}

/// Product visibility filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// All products.
    #[default]
    All,
    /// Products visible to customers.
    Visible,
    /// Products hidden from customers.
    Invisible,
    /// Products with no stock.
    EmptyStock,
    /// Products in moderation.
    StateFailedModeration,
    /// Archived products.
    Archived,
}

/// Filter of `product_list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListFilter {
    /// Seller article codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offer_id: Vec<String>,
    /// Product identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_id: Vec<i64>,
    /// Visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// Request of `product_list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListRequest {
    /// Filter.
    #[serde(default)]
    pub filter: ProductListFilter,
    /// Cursor from the previous page; empty for the first page.
    #[serde(default)]
    pub last_id: String,
    /// Page size, 1 to 1000.
    pub limit: u32,
}

/// Stock summary of a product by quant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuant {
    /// Quant code.
    #[serde(default)]
    pub quant_code: String,
    /// Quant size.
    #[serde(default)]
    pub quant_size: i64,
}

/// One product in a `product_list` page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListItem {
    /// Product identifier.
    pub product_id: i64,
    /// Seller article code.
    #[serde(default)]
    pub offer_id: String,
    /// Product is archived.
    #[serde(default)]
    pub archived: bool,
    /// Has stock at Ozon warehouses.
    #[serde(default)]
    pub has_fbo_stocks: bool,
    /// Has stock at seller warehouses.
    #[serde(default)]
    pub has_fbs_stocks: bool,
    /// Product is discounted.
    #[serde(default)]
    pub is_discounted: bool,
    /// Quants.
    #[serde(default)]
    pub quants: Vec<ProductQuant>,
}

/// One `product_list` page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListPage {
    /// Products.
    #[serde(default)]
    pub items: Vec<ProductListItem>,
    /// Cursor for the next page.
    #[serde(default)]
    pub last_id: String,
    /// Total number of matching products.
    #[serde(default)]
    pub total: i64,
}

/// Response of `product_list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListResponse {
    /// Page.
    #[serde(default)]
    pub result: ProductListPage,
}

/// Request of `product_archive` and `product_unarchive`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductArchiveRequest {
    /// Product identifiers, at most 100.
    pub product_id: Vec<i64>,
}

impl SellerClient {
    /// Returns assortment, creation and update quotas.
    ///
    /// `POST /v4/product/info/limit`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the call fails or the response cannot be decoded.
    pub async fn product_info_limit(&self) -> Result<ProductInfoLimitResponse, SellerError> {
        self.post(ApiVersion::V4, "product/info/limit")
            .payload(&EmptyRequest {})
            .method_limit(PRODUCT_INFO_LIMIT_RATE)
            .send_as()
            .await
    }

    /// Returns one page of products.
    ///
    /// `POST /v3/product/list`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the call fails or the response cannot be decoded.
    pub async fn product_list(
        &self,
        request: &ProductListRequest,
    ) -> Result<ProductListResponse, SellerError> {
        self.post(ApiVersion::V3, "product/list")
            .payload(request)
            .method_limit(PRODUCT_LIST_RATE)
            .send_as()
            .await
    }

    /// Moves products to the archive.
    ///
    /// `POST /v1/product/archive`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::InvalidRequest`] for more than 100 products,
    /// or any error from the call.
    pub async fn product_archive(
        &self,
        request: &ProductArchiveRequest,
    ) -> Result<BoolResult, SellerError> {
        ensure_batch("product_id", request.product_id.len())?;
        self.post(ApiVersion::V1, "product/archive")
            .payload(request)
            .send_as()
            .await
    }

    /// Restores products from the archive.
    ///
    /// `POST /v1/product/unarchive`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::InvalidRequest`] for more than 100 products,
    /// or any error from the call.
    pub async fn product_unarchive(
        &self,
        request: &ProductArchiveRequest,
    ) -> Result<BoolResult, SellerError> {
        ensure_batch("product_id", request.product_id.len())?;
        self.post(ApiVersion::V1, "product/unarchive")
            .payload(request)
            .send_as()
            .await
    }
}
