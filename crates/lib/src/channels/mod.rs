//! Communication channels (WhatsApp Cloud API).
//!
//! Inbound webhook payloads are reduced to an [`InboundMessage`]; replies go out
//! through the [`Delivery`] capability so the gateway can be tested with a double.

mod delivery;
mod inbound;
mod whatsapp;

pub use delivery::{Delivery, DeliveryError};
pub use inbound::{extract_message, InboundMessage};
pub use whatsapp::WhatsAppChannel;
