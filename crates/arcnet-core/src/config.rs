use std::env::VarError;
use std::fmt::Display;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Reads `.env` (if present) into the process environment, then builds
/// [`AppConfig`] from the `ARCGIS_*` / `ARCNET_*` variables.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for a value that does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Builds [`AppConfig`] from the current process environment without
/// touching `.env`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for a value that does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn invalid(var: &str, reason: impl Display) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse::<T>().map_err(|e| invalid(var, e))
}

/// Base URLs must be absolute http(s); the trailing slash is dropped.
fn parse_base_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(invalid(var, format!("expected an http(s) URL, got '{raw}'")))
    }
}

/// Every variable is optional; `lookup` stands in for `std::env::var` so
/// tests can feed a map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };
    let number = |var: &str, default: &str| parse_number::<u64>(var, &or_default(var, default));

    let env = parse_environment(&or_default("ARCNET_ENV", "development"))?;
    let log_level = or_default("ARCNET_LOG_LEVEL", "info");
    let arcgis_api_key = lookup("ARCGIS_API_KEY").ok().filter(|k| !k.is_empty());

    let portal_url = parse_base_url(
        "ARCNET_PORTAL_URL",
        &or_default("ARCNET_PORTAL_URL", "https://www.arcgis.com"),
    )?;
    let logistics_url = parse_base_url(
        "ARCNET_LOGISTICS_URL",
        &or_default("ARCNET_LOGISTICS_URL", "https://logistics.arcgis.com"),
    )?;

    let request_timeout_secs = number("ARCNET_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ARCNET_USER_AGENT", "arcnet/0.1 (network-analysis)");
    let max_retries =
        parse_number::<u32>("ARCNET_MAX_RETRIES", &or_default("ARCNET_MAX_RETRIES", "3"))?;
    let retry_backoff_base_ms = number("ARCNET_RETRY_BACKOFF_BASE_MS", "1000")?;
    let job_poll_interval_ms = number("ARCNET_JOB_POLL_INTERVAL_MS", "1000")?;
    let job_timeout_secs = number("ARCNET_JOB_TIMEOUT_SECS", "600")?;

    Ok(AppConfig {
        env,
        log_level,
        arcgis_api_key,
        portal_url,
        logistics_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        job_poll_interval_ms,
        job_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" | "prod" => Ok(Environment::Production),
        _ => Err(invalid("ARCNET_ENV", format!("unknown environment '{s}'"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
