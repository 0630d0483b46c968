//! Attendify Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebError, WebResult};
use attendify_core::AttendifyConfig;
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Attendify web server
pub struct AttendifyServer {
    state: AppState,
}

impl AttendifyServer {
    /// Create a server from a fully resolved configuration
    pub fn new(config: AttendifyConfig) -> WebResult<Self> {
        config.validate()?;
        let state = AppState::new(config)?;
        Ok(Self { state })
    }

    /// Create a server around prepared state
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn start(self) -> WebResult<()> {
        let address = format!(
            "{}:{}",
            self.state.config.server.host, self.state.config.server.port
        );

        info!("Starting Attendify Web Server");
        info!(
            static_dir = %self.state.config.server.static_dir,
            base_url = %self.state.base_url(),
            "Serving attendance pages"
        );

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> WebResult<()> {
        let app = create_app(self.state);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down gracefully");
        Ok(())
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for AttendifyServer
pub struct AttendifyServerBuilder {
    config: AttendifyConfig,
}

impl AttendifyServerBuilder {
    /// Create a new server builder with default configuration
    pub fn new() -> Self {
        Self {
            config: AttendifyConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: AttendifyConfig) -> Self {
        Self { config }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set static files directory
    pub fn static_dir<S: Into<String>>(mut self, static_dir: S) -> Self {
        self.config.server.static_dir = static_dir.into();
        self
    }

    /// Set the URL students' phones reach the server on
    pub fn public_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.public_base_url = Some(url.into());
        self
    }

    /// Set the webhook that receives accepted submissions
    pub fn sink_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.sink.url = Some(url.into());
        self
    }

    /// Set the token lifetime
    pub fn ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.config.session.ttl_seconds = ttl_seconds;
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<AttendifyServer> {
        AttendifyServer::new(self.config)
    }
}

impl Default for AttendifyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
