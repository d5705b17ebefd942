use serde_json::json;

use super::*;

fn test_client(portal: &str, logistics: &str) -> ArcgisClient {
    ArcgisClient::with_base_urls(Some("test-token"), &ClientOptions::default(), portal, logistics)
        .expect("client construction should not fail")
}

#[test]
fn logistics_endpoint_joins_under_base() {
    let client = test_client("https://www.arcgis.com", "https://logistics.arcgis.com/");
    let url = client.logistics_endpoint(
        "arcgis/rest/services/World/Utilities/GPServer/GetTravelModes/execute",
    );
    assert_eq!(
        url.as_str(),
        "https://logistics.arcgis.com/arcgis/rest/services/World/Utilities/GPServer/GetTravelModes/execute"
    );
}

#[test]
fn portal_endpoint_keeps_base_path_prefix() {
    let client = test_client("https://gis.example.org/portal", "https://logistics.arcgis.com");
    let url = client.portal_endpoint("/sharing/rest/search");
    assert_eq!(url.as_str(), "https://gis.example.org/portal/sharing/rest/search");
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = ArcgisClient::with_base_urls(
        None,
        &ClientOptions::default(),
        "not a url",
        "https://logistics.arcgis.com",
    );
    assert!(matches!(result, Err(ArcgisError::InvalidUrl { .. })));
}

#[test]
fn empty_token_means_anonymous() {
    let client = ArcgisClient::with_base_urls(
        Some(""),
        &ClientOptions::default(),
        "https://www.arcgis.com",
        "https://logistics.arcgis.com",
    )
    .unwrap();
    assert!(!client.is_authenticated());
    assert!(test_client("https://www.arcgis.com", "https://logistics.arcgis.com").is_authenticated());
}

#[test]
fn check_api_error_surfaces_envelope() {
    let body = json!({
        "error": { "code": 498, "message": "Invalid token.", "details": ["Token expired"] }
    });
    let err = ArcgisClient::check_api_error(&body).unwrap_err();
    match err {
        ArcgisError::Api {
            code,
            message,
            details,
        } => {
            assert_eq!(code, 498);
            assert_eq!(message, "Invalid token.");
            assert_eq!(details, vec!["Token expired".to_string()]);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn check_api_error_passes_normal_body() {
    let body = json!({ "results": [] });
    assert!(ArcgisClient::check_api_error(&body).is_ok());
}

#[test]
fn options_follow_app_config() {
    let config = arcnet_core::AppConfig {
        env: arcnet_core::Environment::Test,
        log_level: "debug".to_string(),
        arcgis_api_key: Some("k".to_string()),
        portal_url: "https://www.arcgis.com".to_string(),
        logistics_url: "https://logistics.arcgis.com".to_string(),
        request_timeout_secs: 12,
        user_agent: "ua/1".to_string(),
        max_retries: 1,
        retry_backoff_base_ms: 50,
        job_poll_interval_ms: 20,
        job_timeout_secs: 5,
    };
    let options = ClientOptions::from_app_config(&config);
    assert_eq!(options.timeout_secs, 12);
    assert_eq!(options.user_agent, "ua/1");
    assert_eq!(options.max_retries, 1);
    assert_eq!(options.backoff_base_ms, 50);
    assert_eq!(options.poll_interval_ms, 20);
    assert_eq!(options.job_timeout_secs, 5);

    let client = ArcgisClient::from_app_config(&config).unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.poll_interval, Duration::from_millis(20));
    assert_eq!(client.job_timeout, Duration::from_secs(5));
}
