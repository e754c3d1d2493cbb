//! Outbound message delivery.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery channel not configured: {0}")]
    NotConfigured(&'static str),
    #[error("delivery request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("delivery api error: {0}")]
    Api(String),
}

/// Send-message capability used by the gateway to answer a sender.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Channel id (e.g. "whatsapp").
    fn id(&self) -> &str;
    /// Send a text message to a recipient (e.g. a WhatsApp wa_id). No retry.
    async fn send_message(&self, recipient_id: &str, text: &str) -> Result<(), DeliveryError>;
}
