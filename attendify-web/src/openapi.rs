//! OpenAPI specification for the Attendify web server

use axum::response::Json;
use utoipa::OpenApi;

use crate::handlers::{
    BackendConfigResponse, GenerateTokenRequest, GenerateTokenResponse, HealthResponse,
    HomeResponse, MarkAttendanceRequest, MarkAttendanceResponse, SessionStatusResponse,
};

/// Main OpenAPI specification for the Attendify web server
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendify Web API",
        version = "0.1.0",
        description = "QR code attendance: rotating session tokens and student submissions",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://127.0.0.1:5050", description = "Local development server")
    ),
    paths(
        crate::handlers::home,
        crate::handlers::health_check,
        crate::handlers::get_config,

        // Teacher side
        crate::handlers::generate_token,
        crate::handlers::get_qr,
        crate::handlers::current_session,

        // Student side
        crate::handlers::attendance_redirect,
        crate::handlers::mark_attendance,
    ),
    components(
        schemas(
            HealthResponse,
            HomeResponse,
            BackendConfigResponse,
            GenerateTokenRequest,
            GenerateTokenResponse,
            SessionStatusResponse,
            MarkAttendanceRequest,
            MarkAttendanceResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Configuration", description = "Values the front-end pages read"),
        (name = "Session", description = "Attendance session and QR code"),
        (name = "Attendance", description = "Student submissions"),
    )
)]
pub struct ApiDoc;

/// Get the OpenAPI specification as JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
