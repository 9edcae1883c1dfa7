//! Code Assist API service.
//!
//! HTTP entry point for the analysis tools (debug, refactor, optimize, test,
//! PR generation), the background job protocol, and GitHub export. Each
//! handler is stateless: it resolves the source text, forwards a prompt pair
//! to the LLM, and normalizes the result into a `{ success, data, tool }`
//! envelope. Nothing is persisted beyond the in-process job table.

pub mod error;
pub mod jobs;
pub mod prompts;
pub mod routes;
pub mod state;
pub mod tools;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Request bodies carry whole source files.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/debug", post(routes::debug_handler))
        .route("/api/refactor", post(routes::refactor_handler))
        .route("/api/optimize", post(routes::optimize_handler))
        .route("/api/test", post(routes::test_handler))
        .route("/api/generate-pr", post(routes::generate_pr_handler))
        .route("/api/analyze-all", post(routes::analyze_all_handler))
        .route(
            "/api/jobs/:key",
            post(jobs::create_job_handler).get(jobs::get_job_handler),
        )
        .route("/api/github/export", post(routes::export_handler))
        .route("/api/github/create-pr", post(routes::create_pr_handler))
        .route("/api/health", get(routes::health_handler))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}
