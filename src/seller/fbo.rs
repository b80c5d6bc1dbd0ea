//! FBO postings, fulfilled from Ozon warehouses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{SellerClient, SellerError};
use crate::config::ApiVersion;
use crate::seller::common::{PostingAnalyticsData, PostingProduct, PostingWith, SortDirection};

/// Request of `posting_fbo_get`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FboPostingGetRequest {
    /// Posting number.
    pub posting_number: String,
    /// Transliterate address fields.
    #[serde(default)]
    pub translit: bool,
    /// Optional sections.
    #[serde(default)]
    pub with: PostingWith,
}

/// An FBO posting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FboPosting {
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
    /// Cancellation reason identifier.
    #[serde(default)]
    pub cancel_reason_id: i64,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Processing start time.
    #[serde(default)]
    pub in_process_at: Option<DateTime<Utc>>,
    /// Products.
    #[serde(default)]
    pub products: Vec<PostingProduct>,
    /// Analytics, when requested.
    #[serde(default)]
    pub analytics_data: Option<PostingAnalyticsData>,
    /// Financial data, when requested. Kept untyped.
    #[serde(default)]
    pub financial_data: Option<serde_json::Value>,
    /// Additional data.
    #[serde(default)]
    pub additional_data: Vec<serde_json::Value>,
}

/// Response of `posting_fbo_get`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FboPostingGetResponse {
    /// Posting.
    pub result: FboPosting,
}

/// Filter of `posting_fbo_list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FboPostingFilter {
    /// Start of the period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    /// End of the period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    /// Posting status.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Request of `posting_fbo_list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FboPostingListRequest {
    /// Sort direction.
    #[serde(default)]
    pub dir: SortDirection,
    /// Filter.
    #[serde(default)]
    pub filter: FboPostingFilter,
    /// Page size, at most 1000.
    pub limit: u32,
    /// Number of elements to skip.
    #[serde(default)]
    pub offset: u32,
    /// Transliterate address fields.
    #[serde(default)]
    pub translit: bool,
    /// Optional sections.
    #[serde(default)]
    pub with: PostingWith,
}

impl Default for FboPostingListRequest {
    fn default() -> Self {
        Self {
            dir: SortDirection::Asc,
            filter: FboPostingFilter::default(),
            limit: 100,
            offset: 0,
            translit: false,
            with: PostingWith::default(),
        }
    }
}

/// Response of `posting_fbo_list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FboPostingListResponse {
    /// Postings.
    #[serde(default)]
    pub result: Vec<FboPosting>,
}

impl SellerClient {
    /// Returns one FBO posting.
    ///
    /// `POST /v2/posting/fbo/get`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the call fails or the response cannot be decoded.
    pub async fn posting_fbo_get(
        &self,
        request: &FboPostingGetRequest,
    ) -> Result<FboPostingGetResponse, SellerError> {
        self.post(ApiVersion::V2, "posting/fbo/get")
            .payload(request)
            .send_as()
            .await
    }

    /// Lists FBO postings for a period.
    ///
    /// `POST /v2/posting/fbo/list`
    ///
    /// # Errors
    ///
    /// Returns [`SellerError`] if the call fails or the response cannot be decoded.
    pub async fn posting_fbo_list(
        &self,
        request: &FboPostingListRequest,
    ) -> Result<FboPostingListResponse, SellerError> {
        self.post(ApiVersion::V2, "posting/fbo/list")
            .payload(request)
            .send_as()
            .await
    }
}
