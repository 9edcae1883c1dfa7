//! GitHub REST client used for code export and pull request creation.
//!
//! Covers the three operations the API needs:
//! - reading a file's current blob sha (create-vs-update disambiguation)
//! - creating or updating a file's contents
//! - opening a pull request
//!
//! plus fetching raw file contents from a github.com web URL.

mod models;
mod raw;

pub use models::{CommitInfo, ContentInfo, FileUpdate, FileUpdateResponse, NewPull, Pull};
pub use raw::raw_content_url;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("code-assist/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github.v3+json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Network error: {0}")]
    Network(String),

    /// Provider error message, surfaced verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GithubError::Network(format!("Request timed out: {}", err))
        } else {
            GithubError::Network(err.to_string())
        }
    }
}

/// Shape of GitHub's JSON error bodies.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// One client per request: the token comes from the request body when
/// present, from configuration otherwise.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|err| GithubError::Network(format!("Failed to build HTTP client: {}", err)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Blob sha of `path` at `branch`, or `None` when the file does not exist
    /// yet. Only a 404 maps to `None`; other failures are real errors.
    pub async fn file_sha(
        &self,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, GithubError> {
        #[derive(Deserialize)]
        struct ContentMeta {
            sha: String,
        }

        let url = format!("{}/repos/{}/contents/{}", self.base_url, repo, path);
        let response = self
            .request(self.client.get(&url).query(&[("ref", branch)]))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let meta: ContentMeta = response
            .json()
            .await
            .map_err(|err| GithubError::Parse(format!("Failed to parse content metadata: {}", err)))?;
        Ok(Some(meta.sha))
    }

    /// Create or update `path` on `branch`. The content is base64-encoded
    /// here; callers pass plain text.
    pub async fn put_file(
        &self,
        repo: &str,
        path: &str,
        update: &FileUpdate,
    ) -> Result<FileUpdateResponse, GithubError> {
        let url = format!("{}/repos/{}/contents/{}", self.base_url, repo, path);
        let mut body = serde_json::json!({
            "message": update.message,
            "content": BASE64.encode(&update.content),
            "branch": update.branch,
        });
        // GitHub rejects a null sha on create; only send it on update.
        if let (Some(sha), Some(map)) = (&update.sha, body.as_object_mut()) {
            map.insert("sha".to_string(), serde_json::Value::String(sha.clone()));
        }

        let response = self.request(self.client.put(&url).json(&body)).await?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| GithubError::Parse(format!("Failed to parse update response: {}", err)))
    }

    /// Open a pull request from `head` into `base`.
    pub async fn create_pull(&self, repo: &str, pull: &NewPull) -> Result<Pull, GithubError> {
        let url = format!("{}/repos/{}/pulls", self.base_url, repo);
        let response = self.request(self.client.post(&url).json(pull)).await?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| GithubError::Parse(format!("Failed to parse pull response: {}", err)))
    }

    /// Fetch raw file contents from a github.com URL (web or raw form).
    pub async fn fetch_raw(&self, url: &str) -> Result<String, GithubError> {
        let raw_url = raw_content_url(url);
        log::debug!("Fetching raw content from {}", raw_url);

        let response = self.client.get(&raw_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Api {
                status: status.as_u16(),
                message: format!("Request failed with status code {}", status.as_u16()),
            });
        }
        response
            .text()
            .await
            .map_err(|err| GithubError::Parse(format!("Failed to read raw content: {}", err)))
    }

    async fn request(&self, builder: reqwest::RequestBuilder) -> Result<Response, GithubError> {
        let response = builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT)
            .send()
            .await?;
        Ok(response)
    }

    async fn check_status(response: Response) -> Result<Response, GithubError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("GitHub API error: {}", status_code),
        };
        Err(GithubError::Api {
            status: status_code,
            message,
        })
    }
}
