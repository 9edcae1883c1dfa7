use thiserror::Error;

/// Errors surfaced by [`crate::AssistClient`].
///
/// `Timeout` means the poll budget ran out while the job was still live; it
/// is distinct from `Ok(job)` with a failed status, which means the job
/// itself reported an error.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Job did not finish within {attempts} polls")]
    Timeout { attempts: u32 },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
