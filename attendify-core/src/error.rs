//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

pub type AttendifyResult<T> = Result<T, AttendifyError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Outcome of a rejected attendance submission.
///
/// These are expected, frequent conditions and travel in the `Err` arm of the
/// validation result rather than being logged as faults.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// Token does not match the active session (or no session was ever started)
    #[error("Invalid token")]
    InvalidToken,
    /// Token matches the active session but its deadline has passed
    #[error("Token expired")]
    Expired,
}

impl ValidationError {
    /// Stable machine-readable reason code
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidToken => "invalid_token",
            ValidationError::Expired => "expired",
        }
    }
}

/// Main error type for the Attendify system
#[derive(Error, Debug)]
pub enum AttendifyError {
    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("Attendance sink unavailable: {message}")]
    SinkUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("QR encoding error: {message}")]
    QrEncoding {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Operation timeout: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },
}

impl AttendifyError {
    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            AttendifyError::NotFound { context, .. }
            | AttendifyError::SinkUnavailable { context, .. }
            | AttendifyError::QrEncoding { context, .. }
            | AttendifyError::Config { context, .. }
            | AttendifyError::Timeout { context, .. } => context,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AttendifyError::SinkUnavailable { .. } | AttendifyError::Timeout { .. }
        )
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = &self.context().error_id;
        match self {
            AttendifyError::QrEncoding { .. } => {
                error!(error_id = %error_id, error = %self, "Internal error occurred");
            }
            AttendifyError::Config { .. } => {
                error!(error_id = %error_id, error = %self, "Configuration error");
            }
            AttendifyError::SinkUnavailable { .. } | AttendifyError::Timeout { .. } => {
                warn!(
                    error_id = %error_id,
                    error = %self,
                    "Sink or timeout error (may be recoverable)"
                );
            }
            AttendifyError::NotFound { .. } => {
                debug!(error_id = %error_id, error = %self, "Resource not found");
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::AttendifyError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file and environment variables"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::AttendifyError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! sink_error {
    ($msg:expr, $component:expr) => {
        $crate::AttendifyError::SinkUnavailable {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check that the attendance sink URL is reachable"),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::AttendifyError::SinkUnavailable {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check that the attendance sink URL is reachable"),
        }
    };
}
