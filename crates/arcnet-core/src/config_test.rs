use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ARCNET_ENV"));
}

#[test]
fn build_app_config_applies_defaults_on_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.arcgis_api_key.is_none());
    assert_eq!(cfg.portal_url, "https://www.arcgis.com");
    assert_eq!(cfg.logistics_url, "https://logistics.arcgis.com");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "arcnet/0.1 (network-analysis)");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 1000);
    assert_eq!(cfg.job_poll_interval_ms, 1000);
    assert_eq!(cfg.job_timeout_secs, 600);
}

#[test]
fn build_app_config_reads_api_key() {
    let mut map = HashMap::new();
    map.insert("ARCGIS_API_KEY", "AAPK-test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.arcgis_api_key.as_deref(), Some("AAPK-test"));
    assert_eq!(cfg.require_api_key().unwrap(), "AAPK-test");
}

#[test]
fn empty_api_key_is_treated_as_missing() {
    let mut map = HashMap::new();
    map.insert("ARCGIS_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.arcgis_api_key.is_none());
    let err = cfg.require_api_key().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "ARCGIS_API_KEY"));
}

#[test]
fn portal_url_trailing_slash_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("ARCNET_PORTAL_URL", "https://myorg.maps.arcgis.com/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.portal_url, "https://myorg.maps.arcgis.com");
}

#[test]
fn portal_url_without_scheme_is_rejected() {
    let mut map = HashMap::new();
    map.insert("ARCNET_PORTAL_URL", "www.arcgis.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ARCNET_PORTAL_URL"),
        "expected InvalidEnvVar(ARCNET_PORTAL_URL), got: {result:?}"
    );
}

#[test]
fn request_timeout_secs_override() {
    let mut map = HashMap::new();
    map.insert("ARCNET_REQUEST_TIMEOUT_SECS", "90");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 90);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("ARCNET_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ARCNET_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ARCNET_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("ARCNET_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ARCNET_MAX_RETRIES"),
        "expected InvalidEnvVar(ARCNET_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn job_settings_override() {
    let mut map = HashMap::new();
    map.insert("ARCNET_JOB_POLL_INTERVAL_MS", "250");
    map.insert("ARCNET_JOB_TIMEOUT_SECS", "120");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.job_poll_interval_ms, 250);
    assert_eq!(cfg.job_timeout_secs, 120);
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("ARCGIS_API_KEY", "super-secret-token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-token"));
    assert!(rendered.contains("[redacted]"));
}
