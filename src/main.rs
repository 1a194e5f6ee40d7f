mod config;
mod fallback;
mod gemini;
mod models;
mod parser;
mod pipeline;
mod prompt;
mod routes;

use anyhow::Context;
use routes::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::gemini::GeminiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; every post will use fallback content");
    }
    let gemini = GeminiClient::from_config(&config);
    tracing::info!("Using model {} with API key: {}", gemini.model(), config.api_key_hint());

    let state = AppState { backend: Arc::new(gemini) };
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down");
    }
}
