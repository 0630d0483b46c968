//! Request and response types used by the handlers

use attendify_core::{SessionInfo, SessionSnapshot, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Service banner
#[derive(Serialize, ToSchema)]
pub struct HomeResponse {
    #[schema(example = "Backend is running!")]
    pub message: String,
    #[schema(example = "http://127.0.0.1:5050")]
    pub backend_url: String,
}

/// Configuration the front-end pages read on load
#[derive(Serialize, ToSchema)]
pub struct BackendConfigResponse {
    #[schema(example = "http://127.0.0.1:5050")]
    pub backend_url: String,
    #[schema(example = 120)]
    pub token_ttl_seconds: u64,
}

/// Session start request; the body may be omitted entirely
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateTokenRequest {
    /// Subject label, "General" when absent or blank
    #[schema(example = "Math")]
    pub subject: Option<String>,
}

/// Session start response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateTokenResponse {
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "a1b2c3d4e5f60718")]
    pub token: String,
    #[schema(example = "Math")]
    pub subject: String,
    /// Seconds until the token stops validating
    #[schema(example = 120)]
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    /// Link encoded in the QR image
    pub attendance_url: String,
}

impl From<SessionInfo> for GenerateTokenResponse {
    fn from(info: SessionInfo) -> Self {
        Self {
            status: "success".to_string(),
            token: info.token,
            subject: info.subject,
            expires_in: info.expires_in_seconds,
            expires_at: info.expires_at,
            attendance_url: info.attendance_url,
        }
    }
}

/// Current session status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionStatusResponse {
    #[schema(example = "a1b2c3d4e5f60718")]
    pub token: String,
    #[schema(example = "Math")]
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whole seconds left, zero once expired
    #[schema(example = 87)]
    pub remaining_seconds: i64,
    pub active: bool,
}

impl SessionStatusResponse {
    pub fn at(snapshot: SessionSnapshot, now: DateTime<Utc>) -> Self {
        let remaining = (snapshot.expires_at - now).num_seconds().max(0);
        Self {
            active: now < snapshot.expires_at,
            remaining_seconds: remaining,
            token: snapshot.token,
            subject: snapshot.subject,
            issued_at: snapshot.issued_at,
            expires_at: snapshot.expires_at,
        }
    }
}

/// Student submission
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MarkAttendanceRequest {
    /// Token read from the scanned link
    #[schema(example = "a1b2c3d4e5f60718")]
    #[serde(default)]
    pub token: Option<String>,
    #[schema(example = "Asha Verma")]
    #[serde(default)]
    pub student_name: Option<String>,
    #[schema(example = "21CS042")]
    #[serde(default)]
    pub roll: Option<String>,
}

/// Submission outcome.
///
/// Rejections are normal results, not HTTP errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAttendanceResponse {
    /// "success" or "error"
    #[schema(example = "success")]
    pub status: String,
    pub accepted: bool,
    #[schema(example = "Attendance marked for Asha Verma")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// "invalid_token" or "expired"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MarkAttendanceResponse {
    pub fn accepted(name: &str, subject: String) -> Self {
        Self {
            status: "success".to_string(),
            accepted: true,
            message: format!("Attendance marked for {}", name),
            subject: Some(subject),
            reason: None,
        }
    }

    pub fn rejected(reason: ValidationError) -> Self {
        Self {
            status: "error".to_string(),
            accepted: false,
            message: reason.to_string(),
            subject: None,
            reason: Some(reason.reason().to_string()),
        }
    }
}

/// Query string of the link encoded in the QR code
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Session token
    pub token: Option<String>,
}
