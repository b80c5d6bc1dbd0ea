//! Warehouses and delivery methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{InvalidRequestError, SellerClient, SellerError};
use crate::config::ApiVersion;
use crate::seller::common::EmptyRequest;

/// Warehouse status, matching the seller dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarehouseStatus {
    /// New.
    New,
    /// Created.
    Created,
    /// Disabled.
    Disabled,
    /// Blocked.
    Blocked,
    /// Disabled after reaching a limit.
    DisabledDueToLimit,
    /// Error.
    Error,
    /// A status this SDK does not know yet.
    #[serde(other)]
    Unknown,
}

/// First-mile settings of a warehouse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstMileType {
    /// Drop-off point identifier.
    #[serde(default)]
    pub dropoff_point_id: String,
    /// Drop-off timeslot identifier.
    #[serde(default)]
    pub dropoff_timeslot_id: i64,
    /// Settings are being changed.
    #[serde(default)]
    pub first_mile_is_changing: bool,
    /// `DropOff`, `Pickup` or empty.
    #[serde(default)]
    pub first_mile_type: String,
}

/// One seller warehouse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    /// Warehouse identifier.
    pub warehouse_id: i64,
    /// Warehouse name.
    #[serde(default)]
    pub name: String,
    /// Seller delivers from this warehouse (rFBS).
    #[serde(default)]
    pub is_rfbs: bool,
    /// Accepts items by trusted acceptance.
    #[serde(default)]
    pub has_entrusted_acceptance: bool,
    /// Economy delivery is available.
    #[serde(default)]
    pub is_economy: bool,
    /// Warehouse status.
    pub status: WarehouseStatus,
    /// First-mile settings.
    #[serde(default)]
    pub first_mile_type: Option<FirstMileType>,
    /// Working days, `1` (Monday) through `7` (Sunday).
    #[serde(default)]
    pub working_days: Vec<String>,
}

/// Response of `warehouse_list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseListResponse {
    /// Warehouses.
    #[serde(default)]
    pub result: Vec<Warehouse>,
}

/// Filter for `delivery_method_list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryMethodFilter {
    /// Delivery service identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<i64>,
    /// Delivery method status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Warehouse identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<i64>,
}

/// Request of `delivery_method_list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryMethodListRequest {
    /// Filter.
    #[serde(default)]
    pub filter: DeliveryMethodFilter,
    /// Page size, 1 to 50.
    pub limit: u32,
    /// Number of elements to skip.
    #[serde(default)]
    pub offset: u32,
}

impl Default for DeliveryMethodListRequest {
    fn default() -> Self {
        Self {
            filter: DeliveryMethodFilter::default(),
            limit: DELIVERY_METHOD_PAGE_MAX,
            offset: 0,
        }
    }
}

/// Largest page accepted by `delivery_method_list`.
pub const DELIVERY_METHOD_PAGE_MAX: u32 = 50;

/// One delivery method of a warehouse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryMethod {
    /// Delivery method identifier.
    pub id: i64,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Seller company identifier.
    #[serde(default)]
    pub company_id: i64,
    /// Delivery service identifier.
    #[serde(default)]
    pub provider_id: i64,
    /// Status.
    #[serde(default)]
    pub status: String,
    /// Order assembly deadline, `HH:MM`.
    #[serde(default)]
    pub cutoff: String,
    /// Delivery template identifier.
    #[serde(default)]
    pub template_id: i64,
    /// Warehouse identifier.
    #[serde(default)]
    pub warehouse_id: i64,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Response of `delivery_method_list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryMethodListResponse {
    /// Delivery methods.
    #[serde(default)]
    pub result: Vec<DeliveryMethod>,
    /// More pages are available.
    #[serde(default)]
    pub has_next: bool,
}

impl SellerClient {
    /// Lists FBS and rFBS warehouses.
    ///
    /// `POST /v1/warehouse/list`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the call fails or the response cannot be decoded.
    pub async fn warehouse_list(&self) -> Result<WarehouseListResponse, SellerError> {
        self.post(ApiVersion::V1, "warehouse/list")
            .payload(&EmptyRequest {})
            .send_as()
            .await
    }

    /// Lists delivery methods of warehouses.
    ///
    /// `POST /v1/delivery-method/list`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::InvalidRequest`] if `limit` is outside 1..=50,
    /// or any error from the call.
    pub async fn delivery_method_list(
        &self,
        request: &DeliveryMethodListRequest,
    ) -> Result<DeliveryMethodListResponse, SellerError> {
        if !(1..=DELIVERY_METHOD_PAGE_MAX).contains(&request.limit) {
            return Err(InvalidRequestError::Argument {
                field: "limit",
                reason: format!("must be between 1 and {DELIVERY_METHOD_PAGE_MAX}"),
            }
            .into());
        }
        self.post(ApiVersion::V1, "delivery-method/list")
            .payload(request)
            .send_as()
            .await
    }
}
