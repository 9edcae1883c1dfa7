//! HTTP handlers for the synchronous endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use assist_types::{
    AnalyzeAllRequest, CreatePrRequest, ExportRequest, PrRequest, Tool, ToolEnvelope, ToolRequest,
};
use github_client::{FileUpdate, NewPull};

use crate::error::ApiError;
use crate::state::AppState;
use crate::tools;

async fn tool_handler(
    state: AppState,
    tool: Tool,
    request: ToolRequest,
) -> Result<Json<ToolEnvelope>, ApiError> {
    let envelope = tools::run_tool(&state, tool, &request).await?;
    Ok(Json(envelope))
}

/// POST /api/debug
pub async fn debug_handler(
    State(state): State<AppState>,
    Json(request): Json<ToolRequest>,
) -> Result<Json<ToolEnvelope>, ApiError> {
    tool_handler(state, Tool::Debug, request).await
}

/// POST /api/refactor
pub async fn refactor_handler(
    State(state): State<AppState>,
    Json(request): Json<ToolRequest>,
) -> Result<Json<ToolEnvelope>, ApiError> {
    tool_handler(state, Tool::Refactor, request).await
}

/// POST /api/optimize
pub async fn optimize_handler(
    State(state): State<AppState>,
    Json(request): Json<ToolRequest>,
) -> Result<Json<ToolEnvelope>, ApiError> {
    tool_handler(state, Tool::Optimize, request).await
}

/// POST /api/test
pub async fn test_handler(
    State(state): State<AppState>,
    Json(request): Json<ToolRequest>,
) -> Result<Json<ToolEnvelope>, ApiError> {
    tool_handler(state, Tool::Test, request).await
}

/// POST /api/generate-pr
pub async fn generate_pr_handler(
    State(state): State<AppState>,
    Json(request): Json<PrRequest>,
) -> Result<Json<ToolEnvelope>, ApiError> {
    let envelope = tools::run_generate_pr(&state, &request).await?;
    Ok(Json(envelope))
}

/// POST /api/analyze-all
pub async fn analyze_all_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeAllRequest>,
) -> Result<Json<ToolEnvelope>, ApiError> {
    let envelope = tools::run_analyze_all(&state, &request).await?;
    Ok(Json(envelope))
}

/// POST /api/github/export
///
/// Reads the target path first to pick up an existing blob sha; a failed
/// read means "create" rather than an error.
pub async fn export_handler(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.code.is_empty() || request.filename.is_empty() || request.repo.is_empty() {
        return Err(ApiError::bad_request("Code, filename, and repo are required"));
    }
    if !request.repo.contains('/') {
        return Err(ApiError::bad_request("Repo must be in \"owner/name\" form"));
    }

    let github = state
        .github_client(request.github_token.as_deref())
        .map_err(|err| ApiError::upstream(err.to_string()))?;

    let branch = request
        .branch
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or("main");

    let sha = github
        .file_sha(&request.repo, &request.filename, branch)
        .await
        .unwrap_or_else(|err| {
            log::warn!("Content pre-check failed, treating as create: {}", err);
            None
        });

    let message = request
        .commit_message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Update {} via Code Assistant", request.filename));

    let update = FileUpdate {
        message,
        content: request.code.clone(),
        branch: branch.to_string(),
        sha,
    };

    let response = github
        .put_file(&request.repo, &request.filename, &update)
        .await
        .map_err(|err| ApiError::upstream(err.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "commitUrl": response.commit.html_url,
            "fileUrl": response.content.and_then(|c| c.html_url),
        }
    })))
}

/// POST /api/github/create-pr
pub async fn create_pr_handler(
    State(state): State<AppState>,
    Json(request): Json<CreatePrRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.repo.is_empty() || request.title.is_empty() || request.head.is_empty() {
        return Err(ApiError::bad_request(
            "Repo, title, and head branch are required",
        ));
    }

    let github = state
        .github_client(request.github_token.as_deref())
        .map_err(|err| ApiError::upstream(err.to_string()))?;

    let pull = NewPull {
        title: request.title.clone(),
        body: request.body.clone().unwrap_or_default(),
        head: request.head.clone(),
        base: request
            .base
            .clone()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "main".to_string()),
    };

    let created = github
        .create_pull(&request.repo, &pull)
        .await
        .map_err(|err| ApiError::upstream(err.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "prUrl": created.html_url,
            "prNumber": created.number,
        }
    })))
}

/// GET /api/health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
