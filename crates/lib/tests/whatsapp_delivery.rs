//! Integration test: WhatsAppChannel against a stand-in Graph API.

mod common;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use relay::channels::{Delivery, DeliveryError, WhatsAppChannel};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Captured {
    phone_number_id: String,
    authorization: Option<String>,
    body: serde_json::Value,
}

type Captures = Arc<Mutex<Vec<Captured>>>;

async fn messages(
    State(captures): State<Captures>,
    Path((_version, phone_number_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    captures.lock().unwrap().push(Captured {
        phone_number_id,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    Json(serde_json::json!({ "messages": [{ "id": "wamid.OUT" }] }))
}

fn configured_channel(base: &str) -> WhatsAppChannel {
    WhatsAppChannel::new(
        base,
        "v21.0",
        Some("PHONE_ID".into()),
        Some("ACCESS".into()),
    )
}

#[tokio::test]
async fn sends_text_message_with_bearer_token() {
    let captures: Captures = Arc::default();
    let app = Router::new()
        .route("/:version/:phone_number_id/messages", post(messages))
        .with_state(captures.clone());
    let base = common::serve(app).await;

    let channel = configured_channel(&base);
    assert_eq!(channel.id(), "whatsapp");
    channel
        .send_message("1234567890", "I received your message: 'hi'")
        .await
        .expect("send");

    let captured = captures.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].phone_number_id, "PHONE_ID");
    assert_eq!(captured[0].authorization.as_deref(), Some("Bearer ACCESS"));
    assert_eq!(
        captured[0].body.get("messaging_product").and_then(|v| v.as_str()),
        Some("whatsapp")
    );
    assert_eq!(
        captured[0].body.get("to").and_then(|v| v.as_str()),
        Some("1234567890")
    );
    assert_eq!(
        captured[0].body.pointer("/text/body").and_then(|v| v.as_str()),
        Some("I received your message: 'hi'")
    );
}

#[tokio::test]
async fn api_error_status_is_reported() {
    let app = Router::new().route(
        "/:version/:phone_number_id/messages",
        post(|| async { (StatusCode::BAD_REQUEST, "invalid recipient") }),
    );
    let base = common::serve(app).await;

    let channel = configured_channel(&base);
    let err = channel.send_message("bad", "hi").await.unwrap_err();
    match err {
        DeliveryError::Api(msg) => assert!(msg.contains("400"), "message: {}", msg),
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_api_is_a_request_error() {
    let channel = configured_channel(&common::closed_url());
    let err = channel.send_message("1", "hi").await.unwrap_err();
    assert!(matches!(err, DeliveryError::Request(_)));
}
