//! Client for the Code Assist API.
//!
//! Wraps the background job protocol (submit, then poll `/api/jobs/{id}`
//! until a terminal status) and the synchronous tool endpoints behind typed
//! calls. All long-running work goes through [`AssistClient::poll_job`];
//! [`AssistClient::run_tool`] is the single-request variant for callers that
//! would rather block.

mod error;

#[cfg(test)]
mod tests;

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use assist_types::{Job, JobTicket, Tool, ToolEnvelope, ToolRequest};

pub use error::ClientError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
const DEFAULT_MAX_ATTEMPTS: u32 = 300;

/// Polling knobs for [`AssistClient::poll_job`].
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Delay between consecutive status reads.
    pub interval: Duration,
    /// Hard cap on status reads before giving up.
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// HTTP client for one Code Assist API deployment.
#[derive(Debug, Clone)]
pub struct AssistClient {
    http: reqwest::Client,
    base_url: String,
}

impl AssistClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Submit a background job. `kind` is a tool name, `pr`, or
    /// `analyze-all`; the body shape has to match the kind.
    pub async fn submit_job<B: Serialize>(
        &self,
        kind: &str,
        request: &B,
    ) -> Result<JobTicket, ClientError> {
        let url = format!("{}/api/jobs/{}", self.base_url, kind);
        log::debug!("Submitting '{}' job to {}", kind, url);
        let response = self.http.post(&url).json(request).send().await?;
        let ticket: JobTicket = Self::decode(response).await?;
        log::info!("Submitted '{}' job {}", kind, ticket.job_id);
        Ok(ticket)
    }

    /// One status read.
    pub async fn fetch_job(&self, job_id: Uuid) -> Result<Job, ClientError> {
        let url = format!("{}/api/jobs/{}", self.base_url, job_id);
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    /// Poll a job to a terminal status.
    ///
    /// `on_update` fires after every status read, including the final one.
    /// Returns the terminal job, or [`ClientError::Timeout`] once exactly
    /// `max_attempts` reads have seen a live status.
    pub async fn poll_job<F>(
        &self,
        job_id: Uuid,
        options: &PollOptions,
        mut on_update: F,
    ) -> Result<Job, ClientError>
    where
        F: FnMut(&Job),
    {
        for attempt in 1..=options.max_attempts {
            let job = self.fetch_job(job_id).await?;
            log::debug!(
                "Poll {}/{} for job {}: {:?}",
                attempt,
                options.max_attempts,
                job_id,
                job.status
            );
            on_update(&job);
            if job.status.is_terminal() {
                return Ok(job);
            }
            if attempt < options.max_attempts {
                tokio::time::sleep(options.interval).await;
            }
        }
        log::warn!(
            "Job {} still live after {} polls, giving up",
            job_id,
            options.max_attempts
        );
        Err(ClientError::Timeout {
            attempts: options.max_attempts,
        })
    }

    /// Submit and poll in one call.
    pub async fn run_job<B: Serialize>(
        &self,
        kind: &str,
        request: &B,
        options: &PollOptions,
    ) -> Result<Job, ClientError> {
        let ticket = self.submit_job(kind, request).await?;
        self.poll_job(ticket.job_id, options, |_| {}).await
    }

    /// Synchronous single-tool run against `/api/{tool}`.
    pub async fn run_tool(
        &self,
        tool: Tool,
        request: &ToolRequest,
    ) -> Result<ToolEnvelope, ClientError> {
        let url = format!("{}/api/{}", self.base_url, tool.name());
        let response = self.http.post(&url).json(request).send().await?;
        Self::decode(response).await
    }

    /// One independent background job per tool, polled concurrently.
    ///
    /// Results come back in the order of `tools`; one tool failing (or
    /// timing out) has no effect on the others.
    pub async fn analyze_many(
        &self,
        tools: &[Tool],
        request: &ToolRequest,
        options: &PollOptions,
    ) -> Vec<Result<Job, ClientError>> {
        let runs = tools
            .iter()
            .map(|tool| self.run_job(tool.name(), request, options));
        futures::future::join_all(runs).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|err| ClientError::Parse(err.to_string()))
    }
}
