//! Configuration types and loading.
//!
//! Config is loaded once at startup from a JSON file (e.g. `~/.relay/config.json`).
//! Secrets and the processor URL may be overridden from the environment; the
//! resolved values are handed to the gateway and never looked up again.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Webhook gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Processor service settings.
    #[serde(default)]
    pub processor: ProcessorConfig,

    /// Channel settings (WhatsApp Cloud API).
    #[serde(default)]
    pub channels: ChannelsConfig,
}

/// Gateway bind, port, and downstream processor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for the webhook endpoints (default 8000).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Base URL of the processor service. Overridden by SERVER_BASE_URL env.
    #[serde(default = "default_processor_url")]
    pub processor_url: String,

    /// Timeout for one processor call, in seconds (default 10).
    #[serde(default = "default_processor_timeout_secs")]
    pub processor_timeout_secs: u64,
}

/// Processor service bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorConfig {
    /// Port for /process and /health (default 8001).
    #[serde(default = "default_processor_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Per-channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsConfig {
    #[serde(default)]
    pub whatsapp: WhatsAppChannelConfig,
}

/// WhatsApp Cloud API config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppChannelConfig {
    /// Sending phone number id. Overridden by WHATSAPP_PHONE_NUMBER_ID env.
    pub phone_number_id: Option<String>,
    /// Bearer token for the Graph API. Overridden by WHATSAPP_ACCESS_TOKEN env.
    pub access_token: Option<String>,
    /// Secret echoed by Meta during the hub.challenge handshake. Overridden by WHATSAPP_WEBHOOK_VERIFY_TOKEN env.
    pub verify_token: Option<String>,
    /// App secret for X-Hub-Signature-256. When unset, POST /webhook bodies are not signature-checked. Overridden by WHATSAPP_APP_SECRET env.
    pub app_secret: Option<String>,
    /// Graph API base URL (default https://graph.facebook.com).
    #[serde(default = "default_whatsapp_api_base")]
    pub api_base: String,
    /// Graph API version segment (default v21.0).
    #[serde(default = "default_whatsapp_api_version")]
    pub api_version: String,
}

fn default_gateway_port() -> u16 {
    8000
}

fn default_processor_port() -> u16 {
    8001
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_processor_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_processor_timeout_secs() -> u64 {
    10
}

fn default_whatsapp_api_base() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_whatsapp_api_version() -> String {
    "v21.0".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_bind(),
            processor_url: default_processor_url(),
            processor_timeout_secs: default_processor_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    pub fn processor_timeout(&self) -> Duration {
        Duration::from_secs(self.processor_timeout_secs)
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            port: default_processor_port(),
            bind: default_bind(),
        }
    }
}

impl Default for WhatsAppChannelConfig {
    fn default() -> Self {
        Self {
            phone_number_id: None,
            access_token: None,
            verify_token: None,
            app_secret: None,
            api_base: default_whatsapp_api_base(),
            api_version: default_whatsapp_api_version(),
        }
    }
}

/// Non-empty trimmed env var, if set.
fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| non_empty(&s))
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn config_value(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty)
}

/// Resolve the webhook verify token: env WHATSAPP_WEBHOOK_VERIFY_TOKEN overrides config.
pub fn resolve_verify_token(config: &Config) -> Option<String> {
    env_override("WHATSAPP_WEBHOOK_VERIFY_TOKEN")
        .or_else(|| config_value(&config.channels.whatsapp.verify_token))
}

/// Resolve the Graph API access token: env WHATSAPP_ACCESS_TOKEN overrides config.
pub fn resolve_access_token(config: &Config) -> Option<String> {
    env_override("WHATSAPP_ACCESS_TOKEN")
        .or_else(|| config_value(&config.channels.whatsapp.access_token))
}

/// Resolve the sending phone number id: env WHATSAPP_PHONE_NUMBER_ID overrides config.
pub fn resolve_phone_number_id(config: &Config) -> Option<String> {
    env_override("WHATSAPP_PHONE_NUMBER_ID")
        .or_else(|| config_value(&config.channels.whatsapp.phone_number_id))
}

/// Resolve the app secret used for signature checks: env WHATSAPP_APP_SECRET overrides config.
pub fn resolve_app_secret(config: &Config) -> Option<String> {
    env_override("WHATSAPP_APP_SECRET")
        .or_else(|| config_value(&config.channels.whatsapp.app_secret))
}

/// Resolve the processor base URL: env SERVER_BASE_URL overrides config. Trailing slashes are removed.
pub fn resolve_processor_url(config: &Config) -> String {
    env_override("SERVER_BASE_URL")
        .unwrap_or_else(|| config.gateway.processor_url.trim().to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("RELAY_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".relay").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, RELAY_CONFIG_PATH, or the default path. Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
