//! Integration tests for the Ozon Seller API SDK.
//!
//! These tests verify end-to-end functionality of the configuration system
//! and how it feeds client construction.

use std::io::Write;
use std::time::Duration;

use ozon_seller_api::{
    AccessToken, ApiKey, AuthType, BaseUrl, ClientId, ConfigError, Credentials, SellerClient,
    SellerConfig, SellerRuntime,
};

#[test]
fn test_full_workflow_create_newtypes_build_config_access_fields() {
    // Create validated newtypes
    let client_id = ClientId::new("836152").unwrap();
    let api_key = ApiKey::new("0a1b2c3d-key").unwrap();
    let base_url = BaseUrl::new("https://api-seller.example.com/").unwrap();

    // Build configuration
    let config = SellerConfig::builder()
        .client_id(client_id.clone())
        .api_key(api_key)
        .base_url(base_url)
        .max_requests_per_second(20)
        .max_retries(5)
        .retry_min_wait(Duration::from_millis(500))
        .retry_max_wait(Duration::from_secs(2))
        .user_agent_prefix("TestApp/1.0")
        .build()
        .unwrap();

    // Access fields and verify
    assert_eq!(config.credential_identity(), "836152");
    assert_eq!(config.auth_type(), AuthType::ApiKey);
    assert_eq!(config.base_url().as_ref(), "https://api-seller.example.com");
    assert_eq!(config.max_requests_per_second(), 20);
    assert_eq!(config.max_retries(), 5);
    assert_eq!(config.user_agent_prefix(), Some("TestApp/1.0"));
    assert!(matches!(
        config.credentials(),
        Credentials::ApiKey { client_id: id, .. } if id == &client_id
    ));
}

#[test]
fn test_config_errors_are_descriptive() {
    let result = SellerConfig::builder()
        .client_id(ClientId::new("1").unwrap())
        .api_key(ApiKey::new("k").unwrap())
        .max_requests_per_second(51)
        .build();
    let error = result.unwrap_err();
    assert!(matches!(
        error,
        ConfigError::OutOfRange {
            field: "max_requests_per_second",
            ..
        }
    ));
    assert!(error.to_string().contains("max_requests_per_second"));
}

#[test]
fn test_layered_sources_feed_the_client() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join(".env");
    let mut file = std::fs::File::create(&env_path).unwrap();
    writeln!(file, "OZON_SELLER_CLIENT_ID=from-file").unwrap();
    writeln!(file, "OZON_SELLER_API_KEY=file-key").unwrap();
    writeln!(file, "OZON_SELLER_MAX_REQUESTS_PER_SECOND=5").unwrap();
    writeln!(file, "OZON_SELLER_REQUEST_TIMEOUT=12.5").unwrap();
    drop(file);

    let config = SellerConfig::builder()
        .env_vars([("ozon_seller_max_requests_per_second", "15")])
        .env_file(&env_path)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.credential_identity(), "from-file");
    assert_eq!(config.max_requests_per_second(), 15);
    assert_eq!(config.request_timeout(), Duration::from_millis(12_500));

    let runtime = SellerRuntime::new();
    let client = SellerClient::new(&runtime, config).unwrap();
    let stats = runtime.client_limiters().stats();
    assert_eq!(stats[client.credential_identity()].config.max_requests(), 15);
}

#[test]
fn test_missing_env_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let result = SellerConfig::builder().env_file(dir.path().join("absent.env"));
    assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
}

#[test]
fn test_token_from_env_wins_over_key_pair() {
    let config = SellerConfig::builder()
        .env_vars([
            ("OZON_SELLER_CLIENT_ID", "42"),
            ("OZON_SELLER_API_KEY", "key"),
            ("OZON_SELLER_TOKEN", "Bearer env-token"),
        ])
        .build()
        .unwrap();

    assert_eq!(config.auth_type(), AuthType::OAuth);
    assert_eq!(config.credential_identity(), "42");
    match config.credentials() {
        Credentials::Bearer { token, .. } => assert_eq!(token.as_ref(), "env-token"),
        other => panic!("Expected bearer credentials, got: {other:?}"),
    }
}

#[test]
fn test_secrets_are_masked_in_debug_output() {
    let config = SellerConfig::builder()
        .client_id(ClientId::new("visible-id").unwrap())
        .api_key(ApiKey::new("super-secret-key").unwrap())
        .build()
        .unwrap();
    let debug = format!("{config:?}");
    assert!(debug.contains("visible-id"));
    assert!(!debug.contains("super-secret-key"));

    let token = AccessToken::new("super-secret-token").unwrap();
    assert!(!format!("{token:?}").contains("super-secret-token"));
}

#[test]
fn test_all_public_types_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SellerConfig>();
    assert_send_sync::<SellerClient>();
    assert_send_sync::<SellerRuntime>();
    assert_send_sync::<ozon_seller_api::SellerError>();
}
