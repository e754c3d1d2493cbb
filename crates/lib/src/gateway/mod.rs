//! Gateway: WhatsApp webhook endpoints.
//!
//! `GET /webhook` answers Meta's verification handshake; `POST /webhook` extracts the
//! message, asks the processor for a reply, and delivers it to the sender.

mod error;
mod server;
mod verify;

pub use error::GatewayError;
pub use server::{handle_event, router, run_gateway, GatewayState, WebhookAck};
pub use verify::{compute_signature, verify_challenge, verify_signature, VerificationChallenge};
