//! Integration tests for the typed Seller API methods.
//!
//! These tests verify that each method posts the expected body to the
//! expected versioned path with the expected authentication headers, and
//! decodes the response.

use std::time::Duration;

use ozon_seller_api::seller::barcode::{
    BarcodeAddRequest, BarcodeBinding, BarcodeGenerateRequest, BARCODE_ADD_RATE,
};
use ozon_seller_api::seller::fbo::{FboPostingFilter, FboPostingGetRequest, FboPostingListRequest};
use ozon_seller_api::seller::fbs::{AwaitingDeliveryRequest, FbsPostingGetRequest};
use ozon_seller_api::seller::product::{
    ProductArchiveRequest, ProductListFilter, ProductListRequest, Visibility, PRODUCT_LIST_RATE,
};
use ozon_seller_api::seller::warehouse::{
    DeliveryMethodFilter, DeliveryMethodListRequest, WarehouseStatus,
};
use ozon_seller_api::seller::common::SortDirection;
use ozon_seller_api::{
    AccessToken, ApiKey, BaseUrl, ClientId, InvalidRequestError, SellerClient, SellerConfig,
    SellerError, SellerRuntime,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a key-authenticated client against `server`.
fn key_client(runtime: &SellerRuntime, server: &MockServer) -> SellerClient {
    let config = SellerConfig::builder()
        .client_id(ClientId::new("100500").unwrap())
        .api_key(ApiKey::new("secret-key").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .max_retries(0)
        .build()
        .unwrap();
    SellerClient::new(runtime, config).unwrap()
}

// ============================================================================
// Authentication Headers
// ============================================================================

#[tokio::test]
async fn test_api_key_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/seller/info"))
        .and(header("Client-Id", "100500"))
        .and(header("Api-Key", "secret-key"))
        .and(header("Content-Type", "application/json"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "company": {"name": "Acme", "inn": "7700000000", "currency": "RUB"},
            "ratings": [],
            "subscription": {"is_premium": true, "type": "PREMIUM_PLUS"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let info = client.seller_info().await.unwrap();
    assert_eq!(info.company.name, "Acme");
    assert_eq!(info.subscription.unwrap().kind, "PREMIUM_PLUS");
}

#[tokio::test]
async fn test_bearer_header_is_sent_without_api_key() {
    let server = MockServer::start().await;
    Mock::given(header_exists("Api-Key"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/warehouse/list"))
        .and(header("Authorization", "Bearer oauth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let config = SellerConfig::builder()
        .token(AccessToken::new("oauth-token").unwrap())
        .client_id(ClientId::new("100500").unwrap())
        .api_key(ApiKey::new("ignored").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    let client = SellerClient::new(&runtime, config).unwrap();

    client.warehouse_list().await.unwrap();
    assert_eq!(client.credential_identity(), "100500");
}

// ============================================================================
// Facade Requests
// ============================================================================

#[tokio::test]
async fn test_warehouse_list_decodes_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/warehouse/list"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"warehouse_id": 1, "name": "North", "status": "created", "is_rfbs": false},
                {"warehouse_id": 2, "name": "South", "status": "disabled_due_to_limit"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let response = client.warehouse_list().await.unwrap();
    assert_eq!(response.result.len(), 2);
    assert_eq!(response.result[0].status, WarehouseStatus::Created);
    assert_eq!(response.result[1].status, WarehouseStatus::DisabledDueToLimit);
}

#[tokio::test]
async fn test_delivery_method_list_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/delivery-method/list"))
        .and(body_json(json!({
            "filter": {"warehouse_id": 7},
            "limit": 10,
            "offset": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"id": 15, "name": "Courier", "warehouse_id": 7, "cutoff": "13:00"}],
            "has_next": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let response = client
        .delivery_method_list(&DeliveryMethodListRequest {
            filter: DeliveryMethodFilter {
                warehouse_id: Some(7),
                ..Default::default()
            },
            limit: 10,
            offset: 20,
        })
        .await
        .unwrap();
    assert!(response.has_next);
    assert_eq!(response.result[0].cutoff, "13:00");
}

#[tokio::test]
async fn test_product_list_uses_method_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/product/list"))
        .and(body_json(json!({
            "filter": {"offer_id": ["A-1"], "visibility": "VISIBLE"},
            "last_id": "",
            "limit": 50
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "items": [{"product_id": 99, "offer_id": "A-1", "archived": false}],
                "last_id": "WzEwXQ==",
                "total": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let response = client
        .product_list(&ProductListRequest {
            filter: ProductListFilter {
                offer_id: vec!["A-1".to_string()],
                visibility: Some(Visibility::Visible),
                ..Default::default()
            },
            limit: 50,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.result.total, 1);
    assert_eq!(response.result.items[0].product_id, 99);
    assert!(runtime
        .method_limiters()
        .unwrap()
        .contains("100500", PRODUCT_LIST_RATE.method_identifier));
}

#[tokio::test]
async fn test_product_info_limit_posts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/product/info/limit"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily_create": {"limit": 1000, "usage": 1},
            "daily_update": {"limit": 2000, "usage": 2},
            "total": {"limit": -1, "usage": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let response = client.product_info_limit().await.unwrap();
    assert_eq!(response.daily_update.usage, 2);
}

#[tokio::test]
async fn test_product_archive_and_unarchive() {
    let server = MockServer::start().await;
    for endpoint in ["/v1/product/archive", "/v1/product/unarchive"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_json(json!({"product_id": [1, 2, 3]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": true})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);
    let request = ProductArchiveRequest {
        product_id: vec![1, 2, 3],
    };

    assert!(client.product_archive(&request).await.unwrap().result);
    assert!(client.product_unarchive(&request).await.unwrap().result);
}

#[tokio::test]
async fn test_barcode_methods() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/barcode/add"))
        .and(body_json(json!({"barcodes": [{"barcode": "4600000000001", "sku": 42}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"barcode": "4600000000001", "code": "DUPLICATE", "error": "exists", "sku": 42}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/barcode/generate"))
        .and(body_json(json!({"product_ids": [42]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": []})))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let added = client
        .barcode_add(&BarcodeAddRequest {
            barcodes: vec![BarcodeBinding {
                barcode: "4600000000001".to_string(),
                sku: 42,
            }],
        })
        .await
        .unwrap();
    assert_eq!(added.errors[0].code, "DUPLICATE");

    let generated = client
        .barcode_generate(&BarcodeGenerateRequest {
            product_ids: vec![42],
        })
        .await
        .unwrap();
    assert!(generated.errors.is_empty());

    let registry = runtime.method_limiters().unwrap();
    assert_eq!(registry.len(), 2);
    let stats = registry.stats();
    let add_stats = stats
        .iter()
        .find(|(key, _)| key.method == BARCODE_ADD_RATE.method_identifier)
        .map(|(_, stats)| stats)
        .unwrap();
    assert_eq!(add_stats.config.max_requests(), 20);
    assert_eq!(add_stats.config.interval(), Duration::from_secs(60));
}

#[tokio::test]
async fn test_fbo_methods() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/posting/fbo/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"posting_number": "1-1-1", "status": "delivered", "products": []}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/posting/fbo/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"posting_number": "1-1-1"}, {"posting_number": "2-2-2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let posting = client
        .posting_fbo_get(&FboPostingGetRequest {
            posting_number: "1-1-1".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(posting.result.status, "delivered");

    let list = client
        .posting_fbo_list(&FboPostingListRequest {
            dir: SortDirection::Desc,
            filter: FboPostingFilter {
                status: "delivered".to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.result.len(), 2);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(body["dir"], "DESC");
    assert_eq!(body["filter"]["status"], "delivered");
}

#[tokio::test]
async fn test_fbs_methods() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/posting/fbs/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"posting_number": "5-5-5", "status": "awaiting_packaging"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/posting/fbs/cancel-reason/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"id": 352, "title": "Out of stock", "type_id": "seller",
                        "is_available_for_cancellation": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/posting/fbs/awaiting-delivery"))
        .and(body_json(json!({"posting_number": ["5-5-5"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": true})))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let posting = client
        .posting_fbs_get(&FbsPostingGetRequest {
            posting_number: "5-5-5".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(posting.result.status, "awaiting_packaging");

    let reasons = client.posting_fbs_cancel_reason_list().await.unwrap();
    assert!(reasons.result[0].is_available_for_cancellation);

    let shipped = client
        .posting_fbs_awaiting_delivery(&AwaitingDeliveryRequest {
            posting_number: vec!["5-5-5".to_string()],
        })
        .await
        .unwrap();
    assert!(shipped.result);
}

// ============================================================================
// Local Validation
// ============================================================================

#[tokio::test]
async fn test_oversized_batches_never_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": true})))
        .expect(0)
        .mount(&server)
        .await;

    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let archive = client
        .product_archive(&ProductArchiveRequest {
            product_id: (0..101).collect(),
        })
        .await;
    assert!(matches!(
        archive,
        Err(SellerError::InvalidRequest(InvalidRequestError::Argument {
            field: "product_id",
            ..
        }))
    ));

    let delivery = client
        .posting_fbs_awaiting_delivery(&AwaitingDeliveryRequest {
            posting_number: (0..101).map(|n| n.to_string()).collect(),
        })
        .await;
    assert!(matches!(delivery, Err(SellerError::InvalidRequest(_))));

    let barcodes = client
        .barcode_generate(&BarcodeGenerateRequest {
            product_ids: (0..150).collect(),
        })
        .await;
    assert!(matches!(barcodes, Err(SellerError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_delivery_method_page_size_is_validated() {
    let server = MockServer::start().await;
    let runtime = SellerRuntime::new();
    let client = key_client(&runtime, &server);

    let result = client
        .delivery_method_list(&DeliveryMethodListRequest {
            limit: 51,
            ..Default::default()
        })
        .await;
    assert!(matches!(
        result,
        Err(SellerError::InvalidRequest(InvalidRequestError::Argument { field: "limit", .. }))
    ));
}
