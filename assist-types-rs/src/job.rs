//! Background job shapes for the submit-then-poll protocol.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a background analysis job.
///
/// `Completed` and `Failed` are terminal; a job's status never regresses
/// from a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Response to a job submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTicket {
    pub job_id: Uuid,
    pub status: JobStatus,
}

/// Full job state as returned by `GET /api/jobs/{job_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: Uuid,
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    pub fn pending(job_id: Uuid) -> Self {
        Self {
            job_id,
            status: JobStatus::Pending,
            result: None,
            error: None,
        }
    }
}
