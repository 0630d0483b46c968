//! Route definitions for the Attendify web server

use crate::{handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/config", get(handlers::get_config))
        // Teacher page
        .route(
            "/generate_token",
            get(handlers::generate_token).post(handlers::generate_token),
        )
        .route("/get_qr", get(handlers::get_qr))
        .route("/session", get(handlers::current_session))
        // Student page
        .route("/attendance", get(handlers::attendance_redirect))
        .route("/mark_attendance", post(handlers::mark_attendance))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
}

/// Create all routes combined, with static pages as the fallback
pub fn all_routes(static_dir: &str) -> Router<AppState> {
    api_routes().fallback_service(ServeDir::new(static_dir))
}
