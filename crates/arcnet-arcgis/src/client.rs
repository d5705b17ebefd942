//! HTTP client for the ArcGIS REST API.
//!
//! Wraps `reqwest` with token handling, the `f=json` convention, transient
//! retry, and detection of the `{"error": ...}` envelope that ArcGIS returns
//! with HTTP 200. Operation-specific methods live in the sibling modules.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ArcgisError;
use crate::retry::retry_with_backoff;
use crate::types::ErrorEnvelope;

const DEFAULT_PORTAL_URL: &str = "https://www.arcgis.com/";
const DEFAULT_LOGISTICS_URL: &str = "https://logistics.arcgis.com/";

/// Transport and polling settings for [`ArcgisClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub poll_interval_ms: u64,
    pub job_timeout_secs: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "arcnet/0.1 (network-analysis)".to_string(),
            max_retries: 3,
            backoff_base_ms: 1_000,
            poll_interval_ms: 1_000,
            job_timeout_secs: 600,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn from_app_config(config: &arcnet_core::AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
            poll_interval_ms: config.job_poll_interval_ms,
            job_timeout_secs: config.job_timeout_secs,
        }
    }
}

/// Client for ArcGIS portal and location-service endpoints.
///
/// Use [`ArcgisClient::new`] for production or
/// [`ArcgisClient::with_base_urls`] to point at a mock server in tests.
pub struct ArcgisClient {
    client: Client,
    token: Option<String>,
    portal_url: Url,
    logistics_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
    pub(crate) poll_interval: Duration,
    pub(crate) job_timeout: Duration,
}

impl ArcgisClient {
    /// Creates a client against the public ArcGIS Online endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: Option<&str>, options: &ClientOptions) -> Result<Self, ArcgisError> {
        Self::with_base_urls(token, options, DEFAULT_PORTAL_URL, DEFAULT_LOGISTICS_URL)
    }

    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Http`] if the client cannot be built, or
    /// [`ArcgisError::InvalidUrl`] if a configured URL does not parse.
    pub fn from_app_config(config: &arcnet_core::AppConfig) -> Result<Self, ArcgisError> {
        Self::with_base_urls(
            config.arcgis_api_key.as_deref(),
            &ClientOptions::from_app_config(config),
            &config.portal_url,
            &config.logistics_url,
        )
    }

    /// Creates a client with custom portal and location-service hosts.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ArcgisError::InvalidUrl`] if either base
    /// URL is not a valid URL.
    pub fn with_base_urls(
        token: Option<&str>,
        options: &ClientOptions,
        portal_url: &str,
        logistics_url: &str,
    ) -> Result<Self, ArcgisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            token: token.filter(|t| !t.is_empty()).map(str::to_owned),
            portal_url: normalise_base(portal_url)?,
            logistics_url: normalise_base(logistics_url)?,
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
            poll_interval: Duration::from_millis(options.poll_interval_ms),
            job_timeout: Duration::from_secs(options.job_timeout_secs),
        })
    }

    /// `true` when requests carry a token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn portal_endpoint(&self, path: &str) -> Url {
        join(&self.portal_url, path)
    }

    pub(crate) fn logistics_endpoint(&self, path: &str) -> Url {
        join(&self.logistics_url, path)
    }

    /// Sends a GET with `f=json` and the token appended to `params`, retrying
    /// transient failures, and returns the parsed body.
    ///
    /// # Errors
    ///
    /// - [`ArcgisError::Http`] on network failure or non-2xx status.
    /// - [`ArcgisError::Deserialize`] if the body is not JSON.
    /// - [`ArcgisError::Api`] if the body is an error envelope.
    pub(crate) async fn get_json(
        &self,
        url: &Url,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, ArcgisError> {
        let mut url = url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("f", "json");
            if let Some(token) = &self.token {
                pairs.append_pair("token", token);
            }
        }

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                tracing::debug!(path = url.path(), "ArcGIS GET");
                let response = self.client.get(url.clone()).send().await?;
                let response = response.error_for_status()?;
                let body = response.text().await?;
                Self::parse_body(url.path(), &body)
            }
        })
        .await
    }

    /// Sends a form-encoded POST with `f=json` and the token, retrying
    /// transient failures, and returns the parsed body.
    ///
    /// # Errors
    ///
    /// Same as [`ArcgisClient::get_json`].
    pub(crate) async fn post_form(
        &self,
        url: &Url,
        params: Vec<(String, String)>,
    ) -> Result<serde_json::Value, ArcgisError> {
        let mut form = params;
        form.push(("f".to_string(), "json".to_string()));
        if let Some(token) = &self.token {
            form.push(("token".to_string(), token.clone()));
        }

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let form = &form;
            async move {
                tracing::debug!(path = url.path(), "ArcGIS POST");
                let response = self.client.post(url.clone()).form(form).send().await?;
                let response = response.error_for_status()?;
                let body = response.text().await?;
                Self::parse_body(url.path(), &body)
            }
        })
        .await
    }

    fn parse_body(context: &str, body: &str) -> Result<serde_json::Value, ArcgisError> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|e| ArcgisError::Deserialize {
                context: context.to_string(),
                source: e,
            })?;
        Self::check_api_error(&value)?;
        Ok(value)
    }

    /// Returns [`ArcgisError::Api`] if `body` is an `{"error": ...}` envelope.
    pub(crate) fn check_api_error(body: &serde_json::Value) -> Result<(), ArcgisError> {
        if body.get("error").is_none() {
            return Ok(());
        }
        match serde_json::from_value::<ErrorEnvelope>(body.clone()) {
            Ok(envelope) => Err(ArcgisError::Api {
                code: envelope.error.code,
                message: envelope.error.message,
                details: envelope.error.details,
            }),
            Err(_) => Err(ArcgisError::Api {
                code: 0,
                message: body["error"].to_string(),
                details: Vec::new(),
            }),
        }
    }
}

/// Ensures the base URL ends with exactly one slash so that relative paths
/// join under it rather than replacing its last segment.
fn normalise_base(base_url: &str) -> Result<Url, ArcgisError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ArcgisError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

fn join(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!("{}{}", base.path(), path.trim_start_matches('/'));
    url.set_path(&joined);
    url
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
