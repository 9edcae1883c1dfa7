//! Typed subsets of GitHub's REST payloads.

use serde::{Deserialize, Serialize};

/// A create-or-update of one file. `sha` present means update, absent means
/// create; GitHub resolves concurrent writers through this marker.
#[derive(Debug, Clone)]
pub struct FileUpdate {
    pub message: String,
    /// Plain text; encoded to base64 by the client.
    pub content: String,
    pub branch: String,
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileUpdateResponse {
    pub content: Option<ContentInfo>,
    pub commit: CommitInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentInfo {
    pub html_url: Option<String>,
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPull {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pull {
    pub html_url: String,
    pub number: u64,
}
