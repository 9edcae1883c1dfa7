//! Shared application state.

use ai_client::AiClient;
use assist_config::Settings;
use github_client::{GithubClient, GithubError};

use crate::jobs::JobStore;

/// Shared across all handlers. Cheap to clone: the AI client wraps a pooled
/// reqwest client, the job store is an Arc'd map.
#[derive(Clone)]
pub struct AppState {
    pub llm: AiClient,
    pub github_api_url: String,
    /// Fallback when a request carries no token of its own.
    pub github_token: Option<String>,
    pub jobs: JobStore,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        let llm = AiClient::builder()
            .api_key(&settings.openai_api_key)
            .base_url(&settings.openai_api_url)
            .model(&settings.openai_model)
            .build()
            .unwrap_or_else(|err| {
                // Only reachable if reqwest cannot construct a client at all.
                panic!("Failed to build LLM client: {}", err)
            });

        Self {
            llm,
            github_api_url: settings.github_api_url.clone(),
            github_token: settings.github_token.clone(),
            jobs: JobStore::default(),
        }
    }

    /// Per-request GitHub client: the request's token wins over the
    /// configured fallback.
    pub fn github_client(&self, request_token: Option<&str>) -> Result<GithubClient, GithubError> {
        let token = request_token
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or_else(|| self.github_token.clone())
            .unwrap_or_default();
        GithubClient::new(&self.github_api_url, token)
    }
}
