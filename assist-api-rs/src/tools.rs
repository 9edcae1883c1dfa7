//! Shared per-tool handler logic.
//!
//! The same functions back the synchronous routes, the fan-out route, and the
//! background jobs, so the fan-out never loops back through its own HTTP
//! surface.

use serde_json::{json, Map, Value};
use thiserror::Error;

use ai_client::AnalysisPayload;
use assist_types::{AnalyzeAllRequest, PrRequest, Tool, ToolEnvelope, ToolRequest};

use crate::error::ApiError;
use crate::prompts;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("No code provided")]
    NoCode,

    #[error("Original and modified code required")]
    MissingPrCode,

    #[error("Failed to fetch code from GitHub: {0}")]
    Fetch(String),

    #[error("AI Analysis failed: {0}")]
    Analysis(String),
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NoCode | ToolError::MissingPrCode => ApiError::BadRequest(err.to_string()),
            ToolError::Fetch(_) | ToolError::Analysis(_) => ApiError::Upstream(err.to_string()),
        }
    }
}

/// Effective source text: a present, non-empty `githubUrl` wins and is
/// fetched; otherwise the inline `code` is used. Empty source is rejected
/// before any LLM call.
pub async fn resolve_source(state: &AppState, request: &ToolRequest) -> Result<String, ToolError> {
    let source = match request.github_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            let github = state
                .github_client(None)
                .map_err(|err| ToolError::Fetch(err.to_string()))?;
            github
                .fetch_raw(url)
                .await
                .map_err(|err| ToolError::Fetch(err.to_string()))?
        }
        None => request.code.clone(),
    };

    if source.is_empty() {
        return Err(ToolError::NoCode);
    }
    Ok(source)
}

/// One tool run against already-resolved source text.
pub async fn run_tool_on_source(
    state: &AppState,
    tool: Tool,
    request: &ToolRequest,
    source: &str,
) -> Result<ToolEnvelope, ToolError> {
    let system = prompts::system_prompt(tool, request);
    let user = prompts::user_prompt(request.language.as_deref(), source);

    log::info!("Running {} analysis ({} bytes of source)", tool, source.len());
    let completion = state
        .llm
        .analyze(&system, &user)
        .await
        .map_err(|err| ToolError::Analysis(err.to_string()))?;

    let payload = AnalysisPayload::parse(&completion);
    if !payload.is_structured() {
        log::warn!("{} returned non-JSON output, wrapping as raw text", tool);
    }
    Ok(ToolEnvelope::new(tool.label(), payload.into_value()))
}

/// The full single-tool path: resolve source, then run.
pub async fn run_tool(
    state: &AppState,
    tool: Tool,
    request: &ToolRequest,
) -> Result<ToolEnvelope, ToolError> {
    let source = resolve_source(state, request).await?;
    run_tool_on_source(state, tool, request, &source).await
}

/// PR description generation. Both code fields are required; there is no
/// GitHub URL variant for this tool.
pub async fn run_generate_pr(
    state: &AppState,
    request: &PrRequest,
) -> Result<ToolEnvelope, ToolError> {
    if request.original_code.is_empty() || request.modified_code.is_empty() {
        return Err(ToolError::MissingPrCode);
    }

    let completion = state
        .llm
        .analyze(prompts::pr_system_prompt(), &prompts::pr_user_prompt(request))
        .await
        .map_err(|err| ToolError::Analysis(err.to_string()))?;

    Ok(ToolEnvelope::new(
        "pr-generator",
        AnalysisPayload::parse(&completion).into_value(),
    ))
}

fn envelope_value(envelope: ToolEnvelope) -> Value {
    json!({
        "success": envelope.success,
        "data": envelope.data,
        "tool": envelope.tool,
    })
}

/// Concurrent fan-out over the selected tools.
///
/// The source is resolved once and shared. Every tool runs to completion
/// regardless of the others; a failure becomes an `{ "error": msg }` entry
/// under that tool's key rather than failing the aggregate.
pub async fn run_analyze_all(
    state: &AppState,
    request: &AnalyzeAllRequest,
) -> Result<ToolEnvelope, ToolError> {
    let source = resolve_source(state, &request.request).await?;

    let selected: Vec<String> = request
        .tools
        .clone()
        .unwrap_or_else(|| Tool::ALL.iter().map(|t| t.name().to_string()).collect());

    let runs = selected.iter().map(|name| {
        let source = source.clone();
        async move {
            let value = match name.parse::<Tool>() {
                Err(err) => json!({ "error": err.to_string() }),
                Ok(tool) => match run_tool_on_source(state, tool, &request.request, &source).await {
                    Ok(envelope) => envelope_value(envelope),
                    Err(err) => json!({ "error": err.to_string() }),
                },
            };
            (name.clone(), value)
        }
    });

    let mut results = Map::new();
    for (name, value) in futures::future::join_all(runs).await {
        results.insert(name, value);
    }

    Ok(ToolEnvelope::new("multi-analysis", Value::Object(results)))
}
