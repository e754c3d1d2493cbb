//! Processor: turns message text into a reply.
//!
//! `process` is the pure reply builder; `run_processor` serves it over HTTP
//! (`POST /process`, `GET /health`); `ProcessorClient` is the gateway's handle to that service.

mod client;
mod reply;
mod server;

pub use client::{Processor, ProcessorClient, ProcessorError};
pub use reply::{process, ProcessRequest, ProcessResponse, RANDOM_RANGE};
pub use server::{router, run_processor};
