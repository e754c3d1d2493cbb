//! Inbound message extraction from WhatsApp webhook payloads.
//!
//! Meta posts many event shapes to the same URL (statuses, reactions, media).
//! Only `entry[0].changes[0].value.messages[0]` with a `text.body` and `from`
//! counts as a message; everything else is ignored without error.

use serde_json::Value;

/// A text message from a sender, to be answered by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender_id: String,
    pub text: String,
}

/// Returns the first text message in the payload, or None for any other shape.
pub fn extract_message(payload: &Value) -> Option<InboundMessage> {
    let message = payload
        .get("entry")?
        .get(0)?
        .get("changes")?
        .get(0)?
        .get("value")?
        .get("messages")?
        .get(0)?;
    let text = message.get("text")?.get("body")?.as_str()?;
    let sender_id = message.get("from")?.as_str()?;
    Some(InboundMessage {
        sender_id: sender_id.to_string(),
        text: text.to_string(),
    })
}
