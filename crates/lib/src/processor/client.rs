//! Processor HTTP client (http://localhost:8001 by default).

use crate::processor::reply::{ProcessRequest, ProcessResponse};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("processor request timed out")]
    Timeout,
    #[error("processor request failed: {0}")]
    Request(reqwest::Error),
    #[error("processor api error: {0}")]
    Api(String),
    #[error("processor returned a malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProcessorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProcessorError::Timeout
        } else if e.is_decode() {
            ProcessorError::Decode(e.to_string())
        } else {
            ProcessorError::Request(e)
        }
    }
}

/// Reply-generation capability used by the gateway.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, text: &str) -> Result<ProcessResponse, ProcessorError>;
}

/// Client for the processor service. Built once and shared across requests.
#[derive(Clone)]
pub struct ProcessorClient {
    base_url: String,
    client: reqwest::Client,
}

impl ProcessorClient {
    /// The timeout bounds each whole call (connect, send, read body).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProcessorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProcessorError::Request)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /process — returns the processor's reply for `text`.
    pub async fn process(&self, text: &str) -> Result<ProcessResponse, ProcessorError> {
        let url = format!("{}/process", self.base_url);
        let body = ProcessRequest {
            text: text.to_string(),
        };
        let res = self.client.post(&url).json(&body).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ProcessorError::Api(format!("{} {}", status, body)));
        }
        let data: ProcessResponse = res.json().await?;
        Ok(data)
    }
}

#[async_trait]
impl Processor for ProcessorClient {
    async fn process(&self, text: &str) -> Result<ProcessResponse, ProcessorError> {
        ProcessorClient::process(self, text).await
    }
}
