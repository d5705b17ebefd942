use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub arcgis_api_key: Option<String>,
    pub portal_url: String,
    pub logistics_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub job_poll_interval_ms: u64,
    pub job_timeout_secs: u64,
}

impl AppConfig {
    /// Returns the configured API key, or an error naming the variable to set.
    ///
    /// The analysis services reject anonymous requests, so commands that call
    /// them go through this accessor instead of reading the field directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `ARCGIS_API_KEY` is unset
    /// or blank.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.arcgis_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("ARCGIS_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "arcgis_api_key",
                &self.arcgis_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("portal_url", &self.portal_url)
            .field("logistics_url", &self.logistics_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("job_poll_interval_ms", &self.job_poll_interval_ms)
            .field("job_timeout_secs", &self.job_timeout_secs)
            .finish()
    }
}
