//! Configuration schema definitions.
//!
//! This module defines the on-disk configuration document for the hub.
//! Field names match the JSON keys used by existing deployments, so the
//! Rust names follow the file rather than the other way round.

use serde::{Deserialize, Serialize};

/// Root configuration document.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Bot API credentials.
    #[serde(default)]
    pub token: String,

    /// Default (general) channel of the forum group. `0` until resolved.
    #[serde(default)]
    pub chat_id: i64,

    /// HTTP listener port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Health-check identifier. Empty disables the heartbeat.
    #[serde(default)]
    pub healthcheck_uuid: String,

    /// Heartbeat interval in seconds.
    #[serde(default)]
    pub ping_interval: u64,

    /// Name of the header carrying the shared secret.
    #[serde(default)]
    pub auth_header: String,

    /// Shared secret expected in `auth_header`. Empty disables the check.
    #[serde(default)]
    pub auth_token: String,

    /// Topic list, in file order.
    #[serde(default)]
    pub topics: Vec<Topic>,

    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Base URL of the Bot API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Deadline for every outbound Bot API call, in seconds.
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,

    /// Deadline for an inbound request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Base URL of the health-check service.
    #[serde(default = "default_healthcheck_base_url")]
    pub healthcheck_base_url: String,

    /// Prometheus exporter bind address. Absent disables the exporter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_address: Option<String>,

    /// Directory scanned for formatter modules.
    #[serde(default = "default_formatters_dir")]
    pub formatters_dir: String,

    /// Deadline for a single formatter invocation, in seconds.
    #[serde(default = "default_formatter_timeout_secs")]
    pub formatter_timeout_secs: u64,
}

/// A topic-scoped channel.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Topic {
    /// Human label, also used as the channel title.
    pub name: String,

    /// Lookup key. Derived from `name` when the channel is provisioned.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,

    /// Remote channel identifier. `0` means not yet provisioned.
    #[serde(default, skip_serializing_if = "is_unprovisioned")]
    pub id: i64,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_provisioned(&self) -> bool {
        self.id != 0
    }
}

fn is_unprovisioned(id: &i64) -> bool {
    *id == 0
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_api_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_healthcheck_base_url() -> String {
    "https://hc-ping.com".to_string()
}

fn default_formatters_dir() -> String {
    "formatters".to_string()
}

fn default_formatter_timeout_secs() -> u64 {
    5
}

impl AppConfig {
    /// The template written on first run. It carries one empty topic so the
    /// operator can see the expected shape.
    pub fn bootstrap() -> Self {
        Self {
            topics: vec![Topic::new("")],
            ..Self::default()
        }
    }

    pub fn heartbeat_enabled(&self) -> bool {
        !self.healthcheck_uuid.is_empty()
    }

    pub fn auth_enabled(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: 0,
            port: default_port(),
            healthcheck_uuid: String::new(),
            ping_interval: 0,
            auth_header: String::new(),
            auth_token: String::new(),
            topics: Vec::new(),
            log_level: default_log_level(),
            api_base_url: default_api_base_url(),
            api_timeout_secs: default_api_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            healthcheck_base_url: default_healthcheck_base_url(),
            metrics_address: None,
            formatters_dir: default_formatters_dir(),
            formatter_timeout_secs: default_formatter_timeout_secs(),
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("port", &self.port)
            .field("healthcheck_uuid", &self.healthcheck_uuid)
            .field("ping_interval", &self.ping_interval)
            .field("auth_header", &self.auth_header)
            .field("auth_token", &"<redacted>")
            .field("topics", &self.topics)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("healthcheck_base_url", &self.healthcheck_base_url)
            .field("metrics_address", &self.metrics_address)
            .field("formatters_dir", &self.formatters_dir)
            .field("formatter_timeout_secs", &self.formatter_timeout_secs)
            .finish()
    }
}
