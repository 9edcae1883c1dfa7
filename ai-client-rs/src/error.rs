//! Error type for LLM client operations.

use thiserror::Error;

/// Errors produced while talking to the LLM provider.
///
/// The split between variants drives the retry decision: server and network
/// failures are transient, client errors need intervention.
#[derive(Debug, Error)]
pub enum AiError {
    /// 400/401/403/404 - the request itself is wrong; retrying won't help.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 429 - retried with increasing delays to cool down.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// 5xx - possibly transient provider trouble.
    #[error("Server error: {0}")]
    Server(String),

    /// Connection failures and timeouts.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider returned something we could not decode.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AiError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AiError::Server(_) | AiError::Network(_) | AiError::RateLimited(_)
        )
    }
}
