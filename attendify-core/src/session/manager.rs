//! Session Manager - owns the single active attendance session

use super::types::{ActiveSession, SessionInfo, SessionSettings, SessionSnapshot};
use crate::error::{AttendifyResult, ValidationError};
use crate::token::generate_token;
use crate::{config_error, not_found_error, qr};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Holds the current session behind a lock so that a new session is swapped
/// in atomically with respect to every reader.
pub struct SessionManager {
    current: RwLock<Option<Arc<ActiveSession>>>,
    settings: SessionSettings,
}

impl SessionManager {
    /// Create a manager with no session.
    ///
    /// Fails when the TTL is not positive, or when a link built from the
    /// configured base URL cannot be encoded as a QR code.
    pub fn new(settings: SessionSettings) -> AttendifyResult<Self> {
        if settings.ttl <= chrono::Duration::zero() {
            return Err(config_error!("session TTL must be positive", "session_manager"));
        }

        let probe = attendance_url(
            &settings.public_base_url,
            &"0".repeat(settings.token_bytes * 2),
        );
        qr::render_png(&probe)?;

        Ok(Self {
            current: RwLock::new(None),
            settings,
        })
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Start a new session, discarding any previous one.
    ///
    /// A missing or blank subject falls back to the configured default.
    pub async fn start_session(
        &self,
        subject: Option<&str>,
        now: DateTime<Utc>,
    ) -> AttendifyResult<SessionInfo> {
        crate::log_operation_start!("start_session");

        let subject = subject
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.settings.default_subject.as_str())
            .to_string();

        let expires_at = now
            .checked_add_signed(self.settings.ttl)
            .ok_or_else(|| {
                config_error!(
                    format!(
                        "session deadline out of range for TTL of {}s",
                        self.settings.ttl.num_seconds()
                    ),
                    "session_manager"
                )
            })?;

        let token = generate_token(self.settings.token_bytes);
        let url = attendance_url(&self.settings.public_base_url, &token);
        let qr_png = Bytes::from(qr::render_png(&url)?);

        let session = Arc::new(ActiveSession {
            token,
            subject,
            issued_at: now,
            expires_at,
            attendance_url: url,
            qr_png,
        });

        let info = SessionInfo {
            token: session.token.clone(),
            subject: session.subject.clone(),
            expires_in_seconds: self.settings.ttl.num_seconds(),
            expires_at: session.expires_at,
            attendance_url: session.attendance_url.clone(),
        };

        let previous = self.current.write().await.replace(session);

        crate::log_operation_success!(
            "start_session",
            token = %info.token,
            subject = %info.subject,
            url = %info.attendance_url,
            superseded = ?previous.map(|p| p.token.clone())
        );

        Ok(info)
    }

    /// PNG bytes of the most recently generated QR code
    pub async fn current_qr(&self) -> AttendifyResult<Bytes> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.qr_png.clone())
            .ok_or_else(|| not_found_error!("QR code", "session_manager"))
    }

    /// Read-only view of the active session, if one was ever started
    pub async fn current_session(&self) -> Option<SessionSnapshot> {
        self.current
            .read()
            .await
            .as_deref()
            .map(SessionSnapshot::from)
    }

    /// Check a submitted token against the active session.
    ///
    /// Token equality is checked before expiry, so a stale token from a
    /// replaced session reports `InvalidToken` rather than `Expired`.
    pub async fn validate_submission(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<String, ValidationError> {
        let session = self.current.read().await.clone();

        let outcome = match session {
            Some(session) if session.token == token => {
                if session.is_expired_at(now) {
                    Err(ValidationError::Expired)
                } else {
                    Ok(session.subject.clone())
                }
            }
            _ => Err(ValidationError::InvalidToken),
        };

        match &outcome {
            Ok(subject) => debug!(token, subject = %subject, "Submission accepted"),
            Err(reason) => info!(token, reason = reason.reason(), "Submission rejected"),
        }

        outcome
    }
}

/// Link a student's phone opens after scanning the QR code
pub fn attendance_url(base_url: &str, token: &str) -> String {
    format!("{}/attendance?token={}", base_url.trim_end_matches('/'), token)
}
