//! Session handlers: start a session, serve its QR code, report its status

use super::types::{GenerateTokenRequest, GenerateTokenResponse, SessionStatusResponse};
use crate::{AppState, WebError, WebResult};
use attendify_core::AttendifyError;
use axum::{
    body::Bytes,
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Json},
};
use tracing::info;

/// Start a new attendance session
#[utoipa::path(
    post,
    path = "/generate_token",
    tag = "Session",
    summary = "Start a session",
    description = "Issue a fresh token for the given subject and render its QR code. \
                   Any previous session stops validating immediately. The body is optional.",
    request_body(content = GenerateTokenRequest, description = "Optional subject", content_type = "application/json"),
    responses(
        (status = 200, description = "Session started", body = GenerateTokenResponse),
        (status = 400, description = "Malformed JSON body")
    )
)]
pub async fn generate_token(
    State(state): State<AppState>,
    body: Bytes,
) -> WebResult<Json<GenerateTokenResponse>> {
    let request = parse_optional_body(&body)?;

    let session = state
        .sessions
        .start_session(request.subject.as_deref(), state.clock.now())
        .await?;

    info!(subject = %session.subject, "Attendance session started");
    Ok(Json(session.into()))
}

/// Accept an empty body as "no subject"
fn parse_optional_body(body: &[u8]) -> WebResult<GenerateTokenRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateTokenRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| WebError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Current QR code as PNG
#[utoipa::path(
    get,
    path = "/get_qr",
    tag = "Session",
    summary = "Get the current QR code",
    responses(
        (status = 200, description = "PNG image of the attendance link"),
        (status = 404, description = "No session started yet")
    )
)]
pub async fn get_qr(State(state): State<AppState>) -> WebResult<impl IntoResponse> {
    let png = state.sessions.current_qr().await.map_err(|e| match e {
        AttendifyError::NotFound { .. } => WebError::NotFound("QR not generated".to_string()),
        other => WebError::Core(other),
    })?;

    Ok((
        [(CONTENT_TYPE, "image/png"), (CACHE_CONTROL, "no-store")],
        png,
    ))
}

/// Status of the active session
#[utoipa::path(
    get,
    path = "/session",
    tag = "Session",
    summary = "Get the current session status",
    responses(
        (status = 200, description = "Active or most recent session", body = SessionStatusResponse),
        (status = 404, description = "No session started yet")
    )
)]
pub async fn current_session(
    State(state): State<AppState>,
) -> WebResult<Json<SessionStatusResponse>> {
    let snapshot = state
        .sessions
        .current_session()
        .await
        .ok_or_else(|| WebError::NotFound("No active session".to_string()))?;

    Ok(Json(SessionStatusResponse::at(snapshot, state.clock.now())))
}
