//! Processor HTTP server.

use crate::config::Config;
use crate::processor::reply::{process, ProcessRequest, ProcessResponse};
use crate::shutdown::shutdown_signal;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// Routes for the processor service. Stateless.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_http))
        .route("/process", post(process_http))
}

/// Run the processor server on config.processor.bind:config.processor.port until Ctrl+C / SIGTERM.
pub async fn run_processor(config: Config) -> Result<()> {
    let bind_addr = format!("{}:{}", config.processor.bind.trim(), config.processor.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("processor listening on {}", bind_addr);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("processor server exited")?;
    log::info!("processor stopped");
    Ok(())
}

/// POST /process — malformed bodies are rejected by the Json extractor (4xx).
async fn process_http(Json(req): Json<ProcessRequest>) -> Json<ProcessResponse> {
    log::debug!("processing message ({} bytes)", req.text.len());
    Json(process(&req.text))
}

/// GET /health returns a static liveness payload.
async fn health_http() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "processor",
    }))
}
