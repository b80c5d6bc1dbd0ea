//! FBS postings, fulfilled from seller warehouses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{SellerClient, SellerError};
use crate::config::ApiVersion;
use crate::seller::common::{
    BoolResult, EmptyRequest, PostingAnalyticsData, PostingProduct, PostingWith,
};
use crate::seller::ensure_batch;

/// Optional sections for `posting_fbs_get`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbsPostingWith {
    /// Include analytics data.
    #[serde(default)]
    pub analytics_data: bool,
    /// Include barcodes.
    #[serde(default)]
    pub barcodes: bool,
    /// Include financial data.
    #[serde(default)]
    pub financial_data: bool,
    /// Include product exemplars.
    #[serde(default)]
    pub product_exemplars: bool,
    /// Include related postings.
    #[serde(default)]
    pub related_postings: bool,
    /// Transliterate address fields.
    #[serde(default)]
    pub translit: bool,
}

impl From<PostingWith> for FbsPostingWith {
    fn from(with: PostingWith) -> Self {
        Self {
            analytics_data: with.analytics_data,
            financial_data: with.financial_data,
            ..Self::default()
        }
    }
}

/// Request of `posting_fbs_get`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbsPostingGetRequest {
    /// Posting number.
    pub posting_number: String,
    /// Optional sections.
    #[serde(default)]
    pub with: FbsPostingWith,
}

/// Barcodes of an FBS posting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbsPostingBarcodes {
    /// Lower barcode on the label.
    #[serde(default)]
    pub lower_barcode: String,
    /// Upper barcode on the label.
    #[serde(default)]
    pub upper_barcode: String,
}

/// Cancellation details of an FBS posting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbsCancellation {
    /// Reason identifier.
    #[serde(default)]
    pub cancel_reason_id: i64,
    /// Reason text.
    #[serde(default)]
    pub cancel_reason: String,
    /// Who cancelled.
    #[serde(default)]
    pub cancellation_initiator: String,
    /// Cancellation type.
    #[serde(default)]
    pub cancellation_type: String,
    /// Cancelled after shipping.
    #[serde(default)]
    pub cancelled_after_ship: bool,
}

/// An FBS posting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FbsPosting {
    /// Posting number.
    pub posting_number: String,
    /// Order identifier.
    #[serde(default)]
    pub order_id: i64,
    /// Order number.
    #[serde(default)]
    pub order_number: String,
    /// Posting status.
    #[serde(default)]
    pub status: String,
    /// Posting substatus.
    #[serde(default)]
    pub substatus: String,
    /// Tracking number.
    #[serde(default)]
    pub tracking_number: String,
    /// Tariffication type.
    #[serde(default)]
    pub tpl_integration_type: String,
    /// Processing start time.
    #[serde(default)]
    pub in_process_at: Option<DateTime<Utc>>,
    /// Shipment deadline.
    #[serde(default)]
    pub shipment_date: Option<DateTime<Utc>>,
    /// Delivery time.
    #[serde(default)]
    pub delivering_date: Option<DateTime<Utc>>,
    /// Products.
    #[serde(default)]
    pub products: Vec<PostingProduct>,
    /// Barcodes, when requested.
    #[serde(default)]
    pub barcodes: Option<FbsPostingBarcodes>,
    /// Cancellation details.
    #[serde(default)]
    pub cancellation: Option<FbsCancellation>,
    /// Analytics, when requested.
    #[serde(default)]
    pub analytics_data: Option<PostingAnalyticsData>,
    /// Financial data, when requested. Kept untyped.
    #[serde(default)]
    pub financial_data: Option<serde_json::Value>,
}

/// Response of `posting_fbs_get`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FbsPostingGetResponse {
    /// Posting.
    pub result: FbsPosting,
}

/// A reason a seller may cancel an FBS posting with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReason {
    /// Reason identifier.
    pub id: i64,
    /// Reason text.
    #[serde(default)]
    pub title: String,
    /// Who the reason is attributed to.
    #[serde(default)]
    pub type_id: String,
    /// The reason can be used.
    #[serde(default)]
    pub is_available_for_cancellation: bool,
}

/// Response of `posting_fbs_cancel_reason_list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReasonListResponse {
    /// Reasons.
    #[serde(default)]
    pub result: Vec<CancelReason>,
}

/// Request of `posting_fbs_awaiting_delivery`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitingDeliveryRequest {
    /// Posting numbers, at most 100.
    pub posting_number: Vec<String>,
}

impl SellerClient {
    /// Returns one FBS posting.
    ///
    /// `POST /v3/posting/fbs/get`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the call fails or the response cannot be decoded.
    pub async fn posting_fbs_get(
        &self,
        request: &FbsPostingGetRequest,
    ) -> Result<FbsPostingGetResponse, SellerError> {
        self.post(ApiVersion::V3, "posting/fbs/get")
            .payload(request)
            .send_as()
            .await
    }

    /// Lists reasons available for cancelling FBS postings.
    ///
    /// `POST /v2/posting/fbs/cancel-reason/list`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the call fails or the response cannot be decoded.
    pub async fn posting_fbs_cancel_reason_list(
        &self,
    ) -> Result<CancelReasonListResponse, SellerError> {
        self.post(ApiVersion::V2, "posting/fbs/cancel-reason/list")
            .payload(&EmptyRequest {})
            .send_as()
            .await
    }

    /// Hands assembled postings over for delivery.
    ///
    /// `POST /v2/posting/fbs/awaiting-delivery`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError::InvalidRequest`] for more than 100 postings,
    /// or any error from the call.
    pub async fn posting_fbs_awaiting_delivery(
        &self,
        request: &AwaitingDeliveryRequest,
    ) -> Result<BoolResult, SellerError> {
        ensure_batch("posting_number", request.posting_number.len())?;
        self.post(ApiVersion::V2, "posting/fbs/awaiting-delivery")
            .payload(request)
            .send_as()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_conversion_keeps_shared_flags() {
        let with = FbsPostingWith::from(PostingWith {
            analytics_data: true,
            financial_data: false,
            legal_info: true,
        });
        assert!(with.analytics_data);
        assert!(!with.financial_data);
        assert!(!with.barcodes);
    }

    #[test]
    fn test_posting_parses_cancellation() {
        let response: FbsPostingGetResponse = serde_json::from_str(
            r#"{"result":{"posting_number":"57195475-0050-3","status":"cancelled",
                "cancellation":{"cancel_reason_id":352,"cancel_reason":"Out of stock",
                "cancellation_initiator":"seller","cancelled_after_ship":false},
                "products":[]}}"#,
        )
        .unwrap();
        let cancellation = response.result.cancellation.unwrap();
        assert_eq!(cancellation.cancel_reason_id, 352);
        assert_eq!(cancellation.cancellation_initiator, "seller");
    }
}
