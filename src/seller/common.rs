//! Types shared by several Seller API areas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sort direction for list requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

/// Optional posting sections to include in a response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingWith {
    /// Include analytics data.
    #[serde(default)]
    pub analytics_data: bool,
    /// Include financial data.
    #[serde(default)]
    pub financial_data: bool,
    /// Include legal entity details.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub legal_info: bool,
}

/// Delivery analytics attached to a posting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingAnalyticsData {
    /// Delivery city.
    #[serde(default)]
    pub city: Option<String>,
    /// Start of the customer delivery window.
    #[serde(default)]
    pub client_delivery_date_begin: Option<DateTime<Utc>>,
    /// End of the customer delivery window.
    #[serde(default)]
    pub client_delivery_date_end: Option<DateTime<Utc>>,
    /// Start of delivery.
    #[serde(default)]
    pub delivery_date_begin: Option<DateTime<Utc>>,
    /// End of delivery.
    #[serde(default)]
    pub delivery_date_end: Option<DateTime<Utc>>,
    /// Delivery method.
    #[serde(default)]
    pub delivery_type: Option<String>,
    /// The recipient is a legal entity.
    #[serde(default)]
    pub is_legal: bool,
    /// The recipient has a Premium subscription.
    #[serde(default)]
    pub is_premium: bool,
    /// Payment method group.
    #[serde(default)]
    pub payment_type_group_name: Option<String>,
    /// Delivery region.
    #[serde(default)]
    pub region: Option<String>,
    /// Warehouse identifier.
    #[serde(default)]
    pub warehouse_id: Option<i64>,
    /// Warehouse name.
    #[serde(default)]
    pub warehouse_name: Option<String>,
}

/// One product line in a posting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingProduct {
    /// Product SKU in the Ozon system.
    pub sku: i64,
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// Seller article code.
    #[serde(default)]
    pub offer_id: String,
    /// Quantity.
    #[serde(default)]
    pub quantity: i64,
    /// Price as a decimal string.
    #[serde(default)]
    pub price: String,
    /// Currency of the price.
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// Response carrying only a success flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolResult {
    /// `true` if the request was processed without errors.
    pub result: bool,
}

/// Request with no parameters, serialized as `{}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EmptyRequest {}
