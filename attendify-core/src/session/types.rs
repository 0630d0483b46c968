//! Session types

use crate::types::SessionConfig;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settings the session manager needs, resolved at startup
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Prefix of the link embedded in each QR code, without trailing slash
    pub public_base_url: String,
    pub ttl: chrono::Duration,
    pub default_subject: String,
    pub token_bytes: usize,
}

impl SessionSettings {
    pub fn new(public_base_url: impl Into<String>, config: &SessionConfig) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            ttl: ttl_from_seconds(config.ttl_seconds),
            default_subject: config.default_subject.clone(),
            token_bytes: config.token_bytes,
        }
    }
}

/// Out-of-range values saturate instead of wrapping, so an oversized TTL can
/// never turn into a negative one.
fn ttl_from_seconds(seconds: u64) -> chrono::Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}

/// The stored session record. Replaced as a whole, never edited in place.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub token: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Link encoded in the QR image
    pub attendance_url: String,
    pub qr_png: Bytes,
}

impl ActiveSession {
    /// Valid strictly before `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Returned to the teacher when a session starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub token: String,
    pub subject: String,
    pub expires_in_seconds: i64,
    pub expires_at: DateTime<Utc>,
    pub attendance_url: String,
}

/// Read-only view of the current session, without the image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub attendance_url: String,
}

impl From<&ActiveSession> for SessionSnapshot {
    fn from(session: &ActiveSession) -> Self {
        Self {
            token: session.token.clone(),
            subject: session.subject.clone(),
            issued_at: session.issued_at,
            expires_at: session.expires_at,
            attendance_url: session.attendance_url.clone(),
        }
    }
}
