//! Seller account information.

use serde::{Deserialize, Serialize};

use crate::clients::{SellerClient, SellerError};
use crate::config::ApiVersion;
use crate::seller::common::EmptyRequest;

/// Legal details of the seller company.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerCompany {
    /// Country of registration.
    #[serde(default)]
    pub country: String,
    /// Settlement currency.
    #[serde(default)]
    pub currency: String,
    /// Taxpayer identification number.
    #[serde(default)]
    pub inn: String,
    /// Full legal name.
    #[serde(default)]
    pub legal_name: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Primary state registration number.
    #[serde(default)]
    pub ogrn: String,
    /// Form of ownership.
    #[serde(default)]
    pub ownership_form: String,
    /// Tax system.
    #[serde(default)]
    pub tax_system: String,
}

/// A rating value at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingValue {
    /// Formatted value.
    #[serde(default)]
    pub formatted: String,
    /// Numeric value.
    #[serde(default)]
    pub value: f64,
    /// Status of the value.
    #[serde(default)]
    pub status: Option<RatingStatus>,
}

/// Status of a rating value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingStatus {
    /// Display name of the status.
    #[serde(default)]
    pub name: String,
    /// Status is critical.
    #[serde(default)]
    pub danger: bool,
    /// Status is a warning.
    #[serde(default)]
    pub warning: bool,
    /// Status is premium-level.
    #[serde(default)]
    pub premium: bool,
}

/// One seller rating.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SellerRating {
    /// Rating group.
    #[serde(default)]
    pub group_name: String,
    /// Rating system name.
    #[serde(default)]
    pub rating: String,
    /// Rating display name.
    #[serde(default)]
    pub name: String,
    /// Current value.
    #[serde(default)]
    pub current_value: Option<RatingValue>,
    /// Previous value.
    #[serde(default)]
    pub past_value: Option<RatingValue>,
    /// How the value is interpreted, e.g. `INDEX` or `PERCENT`.
    #[serde(default)]
    pub value_type: String,
}

/// Subscription details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerSubscription {
    /// Premium subscription is active.
    #[serde(default)]
    pub is_premium: bool,
    /// Subscription type.
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// Response of `seller_info`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SellerInfoResponse {
    /// Company details.
    #[serde(default)]
    pub company: SellerCompany,
    /// Ratings.
    #[serde(default)]
    pub ratings: Vec<SellerRating>,
    /// Subscription.
    #[serde(default)]
    pub subscription: Option<SellerSubscription>,
}

impl SellerClient {
    /// Returns company details, ratings and subscription of the seller.
    ///
    /// `POST /v1/seller/info`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the call fails or the response cannot be decoded.
    pub async fn seller_info(&self) -> Result<SellerInfoResponse, SellerError> {
        self.post(ApiVersion::V1, "seller/info")
            .payload(&EmptyRequest {})
            .send_as()
            .await
    }
}
