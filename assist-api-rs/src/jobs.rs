//! Background job table and the job API handlers.
//!
//! Submission inserts a pending job and spawns a task that runs the same
//! handler logic the synchronous routes use. The client-observable contract:
//! `{job_id, status}` on submit, full job state on poll, terminal states
//! sticky.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use assist_types::{AnalyzeAllRequest, Job, JobStatus, JobTicket, PrRequest, Tool, ToolRequest};

use crate::error::ApiError;
use crate::state::AppState;
use crate::tools;

/// In-process job table.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
}

impl JobStore {
    pub async fn create(&self) -> Job {
        let job = Job::pending(Uuid::new_v4());
        self.jobs.write().await.insert(job.job_id, job.clone());
        job
    }

    pub async fn get(&self, job_id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&job_id).cloned()
    }

    /// Apply a transition unless the job is already terminal. Terminal
    /// status never regresses, whatever order late task wakeups arrive in.
    async fn transition(&self, job_id: Uuid, apply: impl FnOnce(&mut Job)) {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&job_id) {
            Some(job) if !job.status.is_terminal() => apply(job),
            Some(job) => log::warn!(
                "Ignoring transition for terminal job {} ({:?})",
                job_id,
                job.status
            ),
            None => log::warn!("Transition for unknown job {}", job_id),
        }
    }

    pub async fn mark_running(&self, job_id: Uuid) {
        self.transition(job_id, |job| job.status = JobStatus::Running).await;
    }

    pub async fn complete(&self, job_id: Uuid, result: Value) {
        self.transition(job_id, |job| {
            job.status = JobStatus::Completed;
            job.result = Some(result);
        })
        .await;
    }

    pub async fn fail(&self, job_id: Uuid, error: String) {
        self.transition(job_id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error);
        })
        .await;
    }
}

/// What a submitted job will run.
#[derive(Debug)]
enum JobKind {
    Tool(Tool, ToolRequest),
    GeneratePr(PrRequest),
    AnalyzeAll(AnalyzeAllRequest),
}

fn parse_job_kind(key: &str, body: Value) -> Result<JobKind, ApiError> {
    let invalid = |err: serde_json::Error| ApiError::bad_request(format!("Invalid job request: {}", err));

    if let Ok(tool) = key.parse::<Tool>() {
        return Ok(JobKind::Tool(tool, serde_json::from_value(body).map_err(invalid)?));
    }
    match key {
        "pr" => Ok(JobKind::GeneratePr(
            serde_json::from_value(body).map_err(invalid)?,
        )),
        "analyze-all" => Ok(JobKind::AnalyzeAll(
            serde_json::from_value(body).map_err(invalid)?,
        )),
        other => Err(ApiError::NotFound(format!("Unknown job kind: {}", other))),
    }
}

/// POST /api/jobs/{kind} - create a background job and return immediately.
pub async fn create_job_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<JobTicket>, ApiError> {
    let kind = parse_job_kind(&key, body)?;
    let job = state.jobs.create().await;
    let job_id = job.job_id;
    log::info!("Created job {} for '{}'", job_id, key);

    let worker_state = state.clone();
    tokio::spawn(async move {
        worker_state.jobs.mark_running(job_id).await;

        let outcome = match &kind {
            JobKind::Tool(tool, request) => tools::run_tool(&worker_state, *tool, request).await,
            JobKind::GeneratePr(request) => tools::run_generate_pr(&worker_state, request).await,
            JobKind::AnalyzeAll(request) => tools::run_analyze_all(&worker_state, request).await,
        };

        match outcome {
            Ok(envelope) => {
                let result = serde_json::json!({
                    "success": envelope.success,
                    "data": envelope.data,
                    "tool": envelope.tool,
                });
                worker_state.jobs.complete(job_id, result).await;
                log::info!("Job {} completed", job_id);
            }
            Err(err) => {
                log::warn!("Job {} failed: {}", job_id, err);
                worker_state.jobs.fail(job_id, err.to_string()).await;
            }
        }
    });

    Ok(Json(JobTicket {
        job_id,
        status: JobStatus::Pending,
    }))
}

/// GET /api/jobs/{job_id} - current job state.
pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let job_id = key
        .parse::<Uuid>()
        .map_err(|_| ApiError::bad_request(format!("Invalid job id: {}", key)))?;

    match state.jobs.get(job_id).await {
        Some(job) => Ok(Json(job)),
        None => Err(ApiError::NotFound(format!("Job not found: {}", job_id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn jobs_start_pending() {
        let store = JobStore::default();
        let job = store.create().await;
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(store.get(job.job_id).await.unwrap().status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn completed_jobs_carry_their_result() {
        let store = JobStore::default();
        let job = store.create().await;
        store.mark_running(job.job_id).await;
        store.complete(job.job_id, json!({"ok": true})).await;

        let stored = store.get(job.job_id).await.unwrap();
        assert_eq!(stored.status, JobStatus::Completed);
        assert_eq!(stored.result, Some(json!({"ok": true})));
        assert_eq!(stored.error, None);
    }

    #[tokio::test]
    async fn terminal_status_never_regresses() {
        let store = JobStore::default();
        let job = store.create().await;
        store.fail(job.job_id, "boom".to_string()).await;

        // A straggling wakeup must not resurrect the job.
        store.mark_running(job.job_id).await;
        store.complete(job.job_id, json!({"late": true})).await;

        let stored = store.get(job.job_id).await.unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(stored.error.as_deref(), Some("boom"));
        assert_eq!(stored.result, None);
    }

    #[test]
    fn unknown_job_kind_is_not_found() {
        let err = parse_job_kind("lint", json!({})).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn tool_job_kinds_parse_their_bodies() {
        let kind = parse_job_kind("refactor", json!({"code": "x", "principles": ["DRY"]})).unwrap();
        match kind {
            JobKind::Tool(Tool::Refactor, request) => {
                assert_eq!(request.principles.as_deref(), Some(&["DRY".to_string()][..]));
            }
            _ => panic!("expected refactor tool job"),
        }
    }
}
