//! Application state shared by all handlers

use crate::{WebError, WebResult};
use attendify_core::{
    sink_from_url, AttendanceSink, AttendifyConfig, Clock, SessionManager, SessionSettings,
    SystemClock,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Configuration, with the public base URL already resolved
    pub config: Arc<AttendifyConfig>,
    /// Owner of the single active attendance session
    pub sessions: Arc<SessionManager>,
    /// Destination for accepted submissions
    pub sink: Arc<dyn AttendanceSink>,
    /// Time source for token validation
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create state with the configured sink and the system clock
    pub fn new(config: AttendifyConfig) -> WebResult<Self> {
        let sink = sink_from_url(config.sink.url.as_deref(), config.sink.timeout_ms)?;
        Self::with_parts(config, sink, Arc::new(SystemClock))
    }

    /// Create state from explicit collaborators
    pub fn with_parts(
        config: AttendifyConfig,
        sink: Arc<dyn AttendanceSink>,
        clock: Arc<dyn Clock>,
    ) -> WebResult<Self> {
        let settings = SessionSettings::new(config.base_url(), &config.session);
        let sessions = SessionManager::new(settings)
            .map_err(|e| WebError::Config(format!("Failed to create session manager: {}", e)))?;

        info!(
            base_url = %config.base_url(),
            sink = sink.name(),
            ttl_seconds = config.session.ttl_seconds,
            "Application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            sink,
            clock,
        })
    }

    /// Public base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.sessions.settings().public_base_url
    }
}
