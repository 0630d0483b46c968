//! Core data type definitions

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendifyConfig {
    pub server: ServerConfig,
    /// Externally reachable URL prefix embedded in QR codes and redirects.
    /// Resolved once at startup when left unset.
    pub public_base_url: Option<String>,
    pub session: SessionConfig,
    pub sink: SinkConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the teacher and student pages
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Validity window of a freshly issued token
    pub ttl_seconds: u64,
    /// Subject used when the teacher leaves it blank
    pub default_subject: String,
    /// Random bytes per token, rendered as hex
    pub token_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Webhook receiving one JSON row per accepted submission.
    /// Rows are only logged when unset.
    pub url: Option<String>,
    /// Upper bound for a single delivery attempt
    pub timeout_ms: u64,
}
