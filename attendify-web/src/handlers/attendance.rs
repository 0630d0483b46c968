//! Student-facing handlers: the scanned link and the submission form

use super::types::{AttendanceQuery, MarkAttendanceRequest, MarkAttendanceResponse};
use crate::AppState;
use attendify_core::{dispatch, AttendanceRecord};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use tracing::info;

/// Record a student's attendance
#[utoipa::path(
    post,
    path = "/mark_attendance",
    tag = "Attendance",
    summary = "Submit attendance",
    description = "Validate the token against the active session. Accepted rows are sent to \
                   the attendance sink in the background; rejections are reported in the body.",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Submission processed", body = MarkAttendanceResponse)
    )
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(request): Json<MarkAttendanceRequest>,
) -> Json<MarkAttendanceResponse> {
    let token = request.token.unwrap_or_default();
    let name = request.student_name.unwrap_or_default();
    let roll = request.roll.unwrap_or_default();

    match state
        .sessions
        .validate_submission(&token, state.clock.now())
        .await
    {
        Ok(subject) => {
            info!(roll = %roll, subject = %subject, "Attendance marked");

            let response = MarkAttendanceResponse::accepted(&name, subject.clone());
            // Delivery happens after the response; the handle is dropped.
            let _ = dispatch(
                state.sink.clone(),
                AttendanceRecord {
                    roll,
                    name,
                    subject,
                    token,
                },
                state.config.sink.timeout_ms,
            );
            Json(response)
        }
        Err(reason) => Json(MarkAttendanceResponse::rejected(reason)),
    }
}

/// Target of the QR code: send the phone to the student page
#[utoipa::path(
    get,
    path = "/attendance",
    tag = "Attendance",
    summary = "Open the student page",
    params(AttendanceQuery),
    responses(
        (status = 303, description = "Redirect to the student page with the token"),
        (status = 400, description = "Token missing")
    )
)]
pub async fn attendance_redirect(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Response {
    match query.token.filter(|t| !t.is_empty()) {
        Some(token) => Redirect::to(&format!(
            "{}/student.html?token={}",
            state.base_url(),
            urlencoding::encode(&token)
        ))
        .into_response(),
        None => (StatusCode::BAD_REQUEST, "Token missing").into_response(),
    }
}
