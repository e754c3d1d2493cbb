//! Relay core library: WhatsApp webhook gateway, message processor, and the
//! configuration shared by both, used by the `relay` CLI.

pub mod channels;
pub mod config;
pub mod gateway;
pub mod processor;
mod shutdown;
