//! Gateway error types and their HTTP mapping.

use crate::channels::DeliveryError;
use crate::processor::ProcessorError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("webhook verification failed")]
    Unauthorized,

    #[error("invalid webhook signature")]
    InvalidSignature,

    #[error("processor call failed: {0}")]
    Processor(#[from] ProcessorError),

    #[error("reply delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::Processor(ProcessorError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Processor(_) => StatusCode::BAD_GATEWAY,
            Self::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Plain text, no hint of the configured token.
            Self::Unauthorized => (status, "Verification failed").into_response(),
            Self::InvalidSignature => (
                status,
                Json(json!({ "status": "error", "message": "invalid signature" })),
            )
                .into_response(),
            Self::Processor(_) => (
                status,
                Json(json!({ "status": "error", "message": "processor unavailable" })),
            )
                .into_response(),
            Self::Delivery(_) => (
                status,
                Json(json!({ "status": "error", "message": "reply delivery failed" })),
            )
                .into_response(),
        }
    }
}
