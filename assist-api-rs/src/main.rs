// assist-api-rs/src/main.rs
// Code Assist API service - HTTP/REST entry point
// Port 5000 by default (PORT env var)

use assist_api::{build_router, AppState};
use assist_config::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();
    let addr = settings.bind_address();

    let state = AppState::from_settings(&settings);
    log::info!("Using LLM endpoint: {}", settings.openai_api_url);
    log::info!("Using model: {}", state.llm.model());

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Code Assist API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
