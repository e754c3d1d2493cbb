//! WhatsApp channel: sends text replies via the Cloud API `/{phone_number_id}/messages`.

use crate::channels::delivery::{Delivery, DeliveryError};
use crate::config::{self, Config};
use async_trait::async_trait;

/// WhatsApp Cloud API sender. The reqwest client is reused for every reply.
pub struct WhatsAppChannel {
    id: String,
    api_base: String,
    api_version: String,
    phone_number_id: Option<String>,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl WhatsAppChannel {
    pub fn new(
        api_base: &str,
        api_version: &str,
        phone_number_id: Option<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            id: "whatsapp".to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_version: api_version.trim_matches('/').to_string(),
            phone_number_id,
            access_token,
            client: reqwest::Client::new(),
        }
    }

    /// Build from config, resolving env overrides for the phone number id and access token.
    pub fn from_config(config: &Config) -> Self {
        let whatsapp = &config.channels.whatsapp;
        Self::new(
            &whatsapp.api_base,
            &whatsapp.api_version,
            config::resolve_phone_number_id(config),
            config::resolve_access_token(config),
        )
    }

    /// True when both the phone number id and access token are set.
    pub fn is_configured(&self) -> bool {
        self.phone_number_id.is_some() && self.access_token.is_some()
    }

    fn messages_url(&self, phone_number_id: &str) -> String {
        format!(
            "{}/{}/{}/messages",
            self.api_base, self.api_version, phone_number_id
        )
    }

    /// Send a text message via the Cloud API. No timeout and no retry.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<(), DeliveryError> {
        let phone_number_id = self
            .phone_number_id
            .as_ref()
            .ok_or(DeliveryError::NotConfigured("whatsapp phone number id"))?;
        let token = self
            .access_token
            .as_ref()
            .ok_or(DeliveryError::NotConfigured("whatsapp access token"))?;
        let url = self.messages_url(phone_number_id);
        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": { "preview_url": false, "body": text },
        });
        let res = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(DeliveryError::Api(format!("sendMessage failed: {} {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl Delivery for WhatsAppChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_message(&self, recipient_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.send_text(recipient_id, text).await
    }
}
