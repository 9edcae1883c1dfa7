//! Request bodies accepted by the API.
//!
//! Field names follow the public contract: camelCase for tool and GitHub
//! endpoints. Optional fields default to empty/None so partial bodies
//! deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Body for the four analysis tools (`/api/debug`, `/api/refactor`,
/// `/api/optimize`, `/api/test`) and their job variants.
///
/// Exactly one of `code` or `github_url` yields the effective source text;
/// `github_url` takes precedence when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    /// Refactor only. Defaults to SOLID, DRY, KISS, Clean Code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principles: Option<Vec<String>>,
    /// Optimize only. Defaults to time/space complexity, memory, speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_areas: Option<Vec<String>>,
    /// Test only. Defaults to auto-detect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_framework: Option<String>,
}

impl ToolRequest {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }
}

/// Body for `/api/generate-pr`. Both code fields are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrRequest {
    #[serde(default)]
    pub original_code: String,
    #[serde(default)]
    pub modified_code: String,
    #[serde(default)]
    pub changes: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Body for `/api/analyze-all`: a `ToolRequest` plus the tool selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeAllRequest {
    #[serde(flatten)]
    pub request: ToolRequest,
    #[serde(default)]
    pub tools: Option<Vec<String>>,
}

/// Body for `/api/github/export`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub filename: String,
    /// "owner/name" form.
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub commit_message: Option<String>,
    #[serde(default)]
    pub github_token: Option<String>,
}

/// Body for `/api/github/create-pr`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrRequest {
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub head: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub github_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_request_uses_camel_case() {
        let req: ToolRequest = serde_json::from_str(
            r#"{"code": "fn main() {}", "githubUrl": null, "testFramework": "pytest"}"#,
        )
        .unwrap();
        assert_eq!(req.code, "fn main() {}");
        assert_eq!(req.github_url, None);
        assert_eq!(req.test_framework.as_deref(), Some("pytest"));
    }

    #[test]
    fn missing_fields_default() {
        let req: ToolRequest = serde_json::from_str("{}").unwrap();
        assert!(req.code.is_empty());
        assert!(req.principles.is_none());
    }

    #[test]
    fn analyze_all_flattens_tool_request() {
        let req: AnalyzeAllRequest = serde_json::from_str(
            r#"{"code": "x = 1", "language": "python", "tools": ["debug", "test"]}"#,
        )
        .unwrap();
        assert_eq!(req.request.code, "x = 1");
        assert_eq!(req.tools.as_deref(), Some(&["debug".to_string(), "test".to_string()][..]));
    }

    #[test]
    fn export_request_accepts_token_field() {
        let req: ExportRequest = serde_json::from_str(
            r#"{"code": "pass", "filename": "a.py", "repo": "me/repo", "githubToken": "ghp_x"}"#,
        )
        .unwrap();
        assert_eq!(req.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(req.branch, None);
    }
}
