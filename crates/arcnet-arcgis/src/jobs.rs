//! Asynchronous geoprocessing jobs: submit, poll, fetch results.

use tokio::time::Instant;

use crate::client::ArcgisClient;
use crate::error::ArcgisError;
use crate::types::{GpParameter, JobInfo, JobStatus};

impl ArcgisClient {
    /// Submits a job to the geoprocessing task at `task_path` (relative to
    /// the location-services host), waits for it to succeed, and returns the
    /// final job descriptor.
    ///
    /// # Errors
    ///
    /// - [`ArcgisError::JobFailed`] if the job ends in any non-success state.
    /// - [`ArcgisError::JobTimeout`] if it is still running after the
    ///   configured job timeout.
    /// - Any request error from submission or polling.
    pub(crate) async fn run_job(
        &self,
        task_path: &str,
        params: Vec<(String, String)>,
    ) -> Result<JobInfo, ArcgisError> {
        let submitted = self.submit_job(task_path, params).await?;
        tracing::info!(task = task_path, job_id = %submitted.job_id, "geoprocessing job submitted");
        let finished = self.wait_for_job(task_path, &submitted.job_id).await?;
        tracing::info!(task = task_path, job_id = %finished.job_id, "geoprocessing job succeeded");
        Ok(finished)
    }

    async fn submit_job(
        &self,
        task_path: &str,
        params: Vec<(String, String)>,
    ) -> Result<JobInfo, ArcgisError> {
        let url = self.logistics_endpoint(&format!("{task_path}/submitJob"));
        let body = self.post_form(&url, params).await?;
        serde_json::from_value(body).map_err(|e| ArcgisError::Deserialize {
            context: format!("{task_path}/submitJob"),
            source: e,
        })
    }

    /// Fetches the current descriptor of a submitted job.
    ///
    /// # Errors
    ///
    /// Returns any request error, or [`ArcgisError::Deserialize`] if the
    /// descriptor does not parse.
    pub async fn job_status(&self, task_path: &str, job_id: &str) -> Result<JobInfo, ArcgisError> {
        let url = self.logistics_endpoint(&format!("{task_path}/jobs/{job_id}"));
        let body = self.get_json(&url, &[]).await?;
        serde_json::from_value(body).map_err(|e| ArcgisError::Deserialize {
            context: format!("job {job_id}"),
            source: e,
        })
    }

    async fn wait_for_job(&self, task_path: &str, job_id: &str) -> Result<JobInfo, ArcgisError> {
        let started = Instant::now();
        loop {
            let info = self.job_status(task_path, job_id).await?;
            tracing::debug!(job_id, status = %info.job_status, "polled job");

            if info.job_status.is_terminal() {
                if info.job_status == JobStatus::Succeeded {
                    return Ok(info);
                }
                return Err(ArcgisError::JobFailed {
                    job_id: job_id.to_string(),
                    status: info.job_status.to_string(),
                    messages: info.error_messages(),
                });
            }

            if started.elapsed() >= self.job_timeout {
                return Err(ArcgisError::JobTimeout {
                    job_id: job_id.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Fetches one output parameter's value from a finished job.
    ///
    /// # Errors
    ///
    /// Returns any request error, or [`ArcgisError::MissingResult`] if the
    /// response carries no `value`.
    pub(crate) async fn job_result(
        &self,
        task_path: &str,
        job_id: &str,
        param: &str,
    ) -> Result<serde_json::Value, ArcgisError> {
        let url = self.logistics_endpoint(&format!("{task_path}/jobs/{job_id}/results/{param}"));
        let body = self.get_json(&url, &[]).await?;
        let parameter: GpParameter =
            serde_json::from_value(body).map_err(|e| ArcgisError::Deserialize {
                context: format!("job {job_id} result {param}"),
                source: e,
            })?;
        if parameter.value.is_null() {
            return Err(ArcgisError::MissingResult {
                param: param.to_string(),
            });
        }
        Ok(parameter.value)
    }

    /// Fetches a job output and deserializes it.
    pub(crate) async fn job_result_as<T: serde::de::DeserializeOwned>(
        &self,
        task_path: &str,
        job_id: &str,
        param: &str,
    ) -> Result<T, ArcgisError> {
        let value = self.job_result(task_path, job_id, param).await?;
        serde_json::from_value(value).map_err(|e| ArcgisError::Deserialize {
            context: format!("job {job_id} result {param}"),
            source: e,
        })
    }
}
