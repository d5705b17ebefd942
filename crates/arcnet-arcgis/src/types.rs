//! ArcGIS REST response types.
//!
//! Geoprocessing services answer `execute` with a list of output parameters
//! and `submitJob` with a job descriptor that is polled until it reaches a
//! terminal status. Any endpoint may instead answer HTTP 200 with an
//! [`ErrorEnvelope`].

use serde::Deserialize;

/// `{"error": {"code": 498, "message": "Invalid token.", "details": []}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}

// ---------------------------------------------------------------------------
// Geoprocessing
// ---------------------------------------------------------------------------

/// Response of a synchronous `execute` call.
#[derive(Debug, Deserialize)]
pub struct GpExecuteResponse {
    #[serde(default)]
    pub results: Vec<GpParameter>,
    #[serde(default)]
    pub messages: Vec<JobMessage>,
}

/// One output parameter: `{"paramName", "dataType", "value"}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpParameter {
    pub param_name: String,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "esriJobNew")]
    New,
    #[serde(rename = "esriJobSubmitted")]
    Submitted,
    #[serde(rename = "esriJobWaiting")]
    Waiting,
    #[serde(rename = "esriJobExecuting")]
    Executing,
    #[serde(rename = "esriJobSucceeded")]
    Succeeded,
    #[serde(rename = "esriJobFailed")]
    Failed,
    #[serde(rename = "esriJobTimedOut")]
    TimedOut,
    #[serde(rename = "esriJobCancelling")]
    Cancelling,
    #[serde(rename = "esriJobCancelled")]
    Cancelled,
    #[serde(rename = "esriJobDeleting")]
    Deleting,
    #[serde(rename = "esriJobDeleted")]
    Deleted,
}

impl JobStatus {
    /// `true` once the job will make no further progress.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded
                | JobStatus::Failed
                | JobStatus::TimedOut
                | JobStatus::Cancelled
                | JobStatus::Deleted
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::New => "esriJobNew",
            JobStatus::Submitted => "esriJobSubmitted",
            JobStatus::Waiting => "esriJobWaiting",
            JobStatus::Executing => "esriJobExecuting",
            JobStatus::Succeeded => "esriJobSucceeded",
            JobStatus::Failed => "esriJobFailed",
            JobStatus::TimedOut => "esriJobTimedOut",
            JobStatus::Cancelling => "esriJobCancelling",
            JobStatus::Cancelled => "esriJobCancelled",
            JobStatus::Deleting => "esriJobDeleting",
            JobStatus::Deleted => "esriJobDeleted",
        };
        f.write_str(s)
    }
}

/// Job descriptor returned by `submitJob` and by the job status endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub job_id: String,
    pub job_status: JobStatus,
    #[serde(default)]
    pub messages: Vec<JobMessage>,
}

impl JobInfo {
    /// Descriptions of error-level messages, or all messages if none are
    /// marked as errors.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        let errors: Vec<String> = self
            .messages
            .iter()
            .filter(|m| m.kind == "esriJobMessageTypeError")
            .map(|m| m.description.clone())
            .collect();
        if errors.is_empty() {
            self.messages.iter().map(|m| m.description.clone()).collect()
        } else {
            errors
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// GetTravelModes
// ---------------------------------------------------------------------------

/// Attributes of one `supported_travel_modes` feature.
///
/// `travel_mode` is the full travel-mode definition as a JSON string; it is
/// passed verbatim to analysis tasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TravelModeRecord {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "AltName", default)]
    pub alt_name: Option<String>,
    #[serde(rename = "TravelModeId", default)]
    pub travel_mode_id: Option<String>,
    #[serde(rename = "TravelMode", default)]
    pub travel_mode: String,
}

// ---------------------------------------------------------------------------
// Portal search
// ---------------------------------------------------------------------------

/// `GET /sharing/rest/search` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub num: i64,
    #[serde(default)]
    pub next_start: i64,
    #[serde(default)]
    pub results: Vec<ContentItem>,
}

/// A portal item summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub num_views: Option<i64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn job_info_parses_status_and_messages() {
        let info: JobInfo = serde_json::from_value(json!({
            "jobId": "j4a5b",
            "jobStatus": "esriJobFailed",
            "messages": [
                { "type": "esriJobMessageTypeInformative", "description": "Submitted." },
                { "type": "esriJobMessageTypeError", "description": "No solution found." }
            ]
        }))
        .unwrap();
        assert_eq!(info.job_status, JobStatus::Failed);
        assert!(info.job_status.is_terminal());
        assert_eq!(info.error_messages(), vec!["No solution found.".to_string()]);
    }

    #[test]
    fn executing_is_not_terminal() {
        assert!(!JobStatus::Executing.is_terminal());
        assert!(!JobStatus::Cancelling.is_terminal());
        assert_eq!(JobStatus::Executing.to_string(), "esriJobExecuting");
    }

    #[test]
    fn error_messages_fall_back_to_all_messages() {
        let info: JobInfo = serde_json::from_value(json!({
            "jobId": "j1",
            "jobStatus": "esriJobCancelled",
            "messages": [{ "type": "esriJobMessageTypeWarning", "description": "Cancelled by user." }]
        }))
        .unwrap();
        assert_eq!(info.error_messages(), vec!["Cancelled by user.".to_string()]);
    }

    #[test]
    fn content_item_tolerates_missing_optional_fields() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": "abc123",
            "title": "Fire Stations",
            "type": "Feature Layer"
        }))
        .unwrap();
        assert_eq!(item.item_type, "Feature Layer");
        assert!(item.url.is_none());
        assert!(item.tags.is_empty());
    }
}
