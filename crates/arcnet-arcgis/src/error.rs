use thiserror::Error;

/// Errors returned by the ArcGIS REST client.
#[derive(Debug, Error)]
pub enum ArcgisError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an `{"error": {...}}` envelope.
    #[error("ArcGIS API error {code}: {message}")]
    Api {
        code: i64,
        message: String,
        details: Vec<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// An input feature set could not be encoded as a request parameter.
    #[error("failed to encode {param}: {source}")]
    Encode {
        param: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No supported travel mode has the requested display name.
    #[error("{0} travel mode not found")]
    TravelModeNotFound(String),

    /// A geoprocessing job finished in a non-success state.
    #[error("job {job_id} ended with status {status}: {}", .messages.join("; "))]
    JobFailed {
        job_id: String,
        status: String,
        messages: Vec<String>,
    },

    #[error("job {job_id} did not finish within {waited_secs}s")]
    JobTimeout { job_id: String, waited_secs: u64 },

    /// A job or execute response lacked an expected output parameter.
    #[error("result parameter '{param}' missing from response")]
    MissingResult { param: String },
}
