//! Gateway HTTP server.

use crate::channels::{extract_message, Delivery, WhatsAppChannel};
use crate::config::{self, Config};
use crate::gateway::error::GatewayError;
use crate::gateway::verify::{verify_challenge, verify_signature, VerificationChallenge};
use crate::processor::{Processor, ProcessorClient};
use crate::shutdown::shutdown_signal;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Acknowledgment body of `POST /webhook`: `{"status":"ok"}` or `{"status":"ignored"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WebhookAck {
    /// A message was processed and the reply delivered.
    Ok,
    /// The payload held no text message (status update, reaction, media, malformed).
    Ignored,
}

/// Shared state for the gateway. Read-only after startup; cloned per request.
#[derive(Clone)]
pub struct GatewayState {
    /// Secret for the hub.challenge handshake. None means the handshake always fails.
    verify_token: Option<Arc<str>>,
    /// When Some, POST bodies must carry a matching X-Hub-Signature-256.
    app_secret: Option<Arc<str>>,
    /// Reported by /health.
    processor_url: Arc<str>,
    processor: Arc<dyn Processor>,
    delivery: Arc<dyn Delivery>,
}

impl GatewayState {
    pub fn new(
        verify_token: Option<String>,
        processor_url: &str,
        processor: Arc<dyn Processor>,
        delivery: Arc<dyn Delivery>,
    ) -> Self {
        Self {
            verify_token: verify_token.map(Arc::from),
            app_secret: None,
            processor_url: Arc::from(processor_url),
            processor,
            delivery,
        }
    }

    /// Require signed POST bodies.
    pub fn with_app_secret(mut self, app_secret: Option<String>) -> Self {
        self.app_secret = app_secret.map(Arc::from);
        self
    }
}

/// Extract the message, call the processor, then deliver its reply. Shape mismatches are
/// `Ignored`; downstream failures are errors and nothing is retried.
pub async fn handle_event(
    state: &GatewayState,
    payload: &serde_json::Value,
) -> Result<WebhookAck, GatewayError> {
    let Some(msg) = extract_message(payload) else {
        log::debug!("webhook ignored: no text message in payload");
        return Ok(WebhookAck::Ignored);
    };
    log::info!("message from {}", msg.sender_id);
    log::debug!("message text: {}", msg.text);

    let response = state.processor.process(&msg.text).await.map_err(|e| {
        log::error!("processor call failed for {}: {}", msg.sender_id, e);
        e
    })?;

    log::info!("sending reply to {} via {}", msg.sender_id, state.delivery.id());
    state
        .delivery
        .send_message(&msg.sender_id, &response.reply)
        .await
        .map_err(|e| {
            log::error!("reply delivery to {} failed: {}", msg.sender_id, e);
            e
        })?;
    Ok(WebhookAck::Ok)
}

/// Routes for the gateway.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health_http))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .with_state(state)
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// Credentials and the processor URL are resolved here, once. Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config) -> Result<()> {
    let verify_token = config::resolve_verify_token(&config);
    if verify_token.is_none() {
        log::warn!("no webhook verify token configured; verification requests will be rejected");
    }
    let app_secret = config::resolve_app_secret(&config);
    if app_secret.is_none() {
        log::info!("no app secret configured; webhook signatures are not checked");
    }

    let whatsapp = WhatsAppChannel::from_config(&config);
    if !whatsapp.is_configured() {
        log::warn!("missing WhatsApp phone number id or access token; replies will fail");
    }

    let processor_url = config::resolve_processor_url(&config);
    let processor = ProcessorClient::new(&processor_url, config.gateway.processor_timeout())
        .context("building processor client")?;
    log::info!("forwarding messages to processor at {}", processor.base_url());

    let state = GatewayState::new(
        verify_token,
        &processor_url,
        Arc::new(processor),
        Arc::new(whatsapp),
    )
    .with_app_secret(app_secret);

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// GET /webhook — Meta verification handshake; echoes hub.challenge or 403.
/// A query that does not deserialize (e.g. a repeated hub.* key) is a failed handshake too.
async fn verify_webhook(
    State(state): State<GatewayState>,
    query: Result<Query<VerificationChallenge>, QueryRejection>,
) -> Result<String, GatewayError> {
    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            log::warn!("webhook verification failed: unreadable query ({})", e.status());
            return Err(GatewayError::Unauthorized);
        }
    };
    match verify_challenge(&params, state.verify_token.as_deref()) {
        Ok(challenge) => {
            log::info!("webhook verification succeeded");
            Ok(challenge)
        }
        Err(e) => {
            log::warn!(
                "webhook verification failed (mode: {:?})",
                params.mode.as_deref().unwrap_or("")
            );
            Err(e)
        }
    }
}

/// POST /webhook — checks the optional signature, then handles the event.
/// Unparseable JSON is acknowledged as ignored so the platform does not retry it.
async fn receive_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, GatewayError> {
    if let Some(ref secret) = state.app_secret {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !verify_signature(secret, &body, provided) {
            log::warn!(
                "webhook signature check failed ({})",
                if provided.is_empty() { "missing" } else { "invalid" }
            );
            return Err(GatewayError::InvalidSignature);
        }
    }
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("webhook ignored: body is not JSON: {}", e);
            return Ok(Json(WebhookAck::Ignored));
        }
    };
    handle_event(&state, &payload).await.map(Json)
}

/// GET /health returns a static liveness payload.
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "gateway",
        "processorUrl": &*state.processor_url,
    }))
}
