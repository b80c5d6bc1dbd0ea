//! Typed Seller API methods.
//!
//! Each submodule adds methods to [`SellerClient`](crate::SellerClient) for
//! one area of the API, together with the request and response types they
//! exchange. Methods with a documented per-method quota declare it as a
//! [`MethodRateLimit`](crate::MethodRateLimit) constant next to the method.
//!
//! | Area | Methods |
//! |---|---|
//! | [`info`] | `seller_info` |
//! | [`warehouse`] | `warehouse_list`, `delivery_method_list` |
//! | [`product`] | `product_info_limit`, `product_list`, `product_archive`, `product_unarchive` |
//! | [`barcode`] | `barcode_add`, `barcode_generate` |
//! | [`fbo`] | `posting_fbo_get`, `posting_fbo_list` |
//! | [`fbs`] | `posting_fbs_get`, `posting_fbs_cancel_reason_list`, `posting_fbs_awaiting_delivery` |
//!
//! # Example
//!
//! ```rust,ignore
//! use ozon_seller_api::seller::product::{ProductListFilter, ProductListRequest, Visibility};
//!
//! let page = client
//!     .product_list(&ProductListRequest {
//!         filter: ProductListFilter {
//!             visibility: Some(Visibility::All),
//!             ..Default::default()
//!         },
//!         limit: 100,
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{} products", page.result.total);
//! ```

pub mod barcode;
pub mod common;
pub mod fbo;
pub mod fbs;
pub mod info;
pub mod product;
pub mod warehouse;

use crate::clients::{InvalidRequestError, SellerError};

/// Most list-valued request fields accept at most this many entries.
pub const MAX_BATCH: usize = 100;

pub(crate) fn ensure_batch(field: &'static str, len: usize) -> Result<(), SellerError> {
    if len > MAX_BATCH {
        return Err(InvalidRequestError::Argument {
            field,
            reason: format!("at most {MAX_BATCH} values per request, got {len}"),
        }
        .into());
    }
    Ok(())
}
