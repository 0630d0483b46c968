//! Attendify Web Server
//!
//! HTTP layer for QR code attendance: teachers start a session and display its
//! QR code, students scan it and submit their name and roll number.

pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::AttendifyServer;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{CONTENT_TYPE, HeaderName},
        Method, StatusCode,
    },
    response::{IntoResponse, Json, Response},
    Router,
};
use attendify_core::AttendifyError;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // The student page may be served through tunnels such as ngrok, which
    // inject their own browser-warning header.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("ngrok-skip-browser-warning"),
        ]);

    routes::all_routes(&state.config.server.static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] AttendifyError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Core(AttendifyError::NotFound { .. }) => StatusCode::NOT_FOUND,
            WebError::Server(_) | WebError::Config(_) | WebError::Core(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        match &self {
            WebError::Core(e) => e.log(),
            _ if status.is_server_error() => tracing::error!(error = %self, "Request failed"),
            _ => tracing::debug!(error = %self, status = %status, "Request rejected"),
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
