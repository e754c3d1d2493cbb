//! Helpers shared by the integration tests: serve a router on a free loopback port
//! and record what the gateway's collaborators were asked to do.

#![allow(dead_code)]

use async_trait::async_trait;
use relay::channels::{Delivery, DeliveryError};
use std::sync::{Arc, Mutex};

/// Serve `app` on 127.0.0.1 with an OS-assigned port; returns its base URL.
/// The listener is bound before returning, so requests can be sent immediately.
pub async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let port = listener.local_addr().expect("local_addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Delivery double that records (recipient, text) pairs.
#[derive(Default)]
pub struct RecordingDelivery {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingDelivery {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    fn id(&self) -> &str {
        "recording"
    }

    async fn send_message(&self, recipient_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient_id.to_string(), text.to_string()));
        if self.fail {
            Err(DeliveryError::Api("503 unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn text_event(from: &str, body: &str) -> serde_json::Value {
    serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA_ID",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": { "phone_number_id": "PHONE_ID" },
                    "contacts": [{ "wa_id": from, "profile": { "name": "Test" } }],
                    "messages": [{
                        "from": from,
                        "id": "wamid.TEST",
                        "timestamp": "1700000000",
                        "type": "text",
                        "text": { "body": body }
                    }]
                }
            }]
        }]
    })
}
