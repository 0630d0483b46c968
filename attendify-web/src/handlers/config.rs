//! Service information handlers

use super::types::{BackendConfigResponse, HomeResponse};
use crate::AppState;
use axum::{extract::State, response::Json};

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "Configuration",
    summary = "Service banner",
    responses(
        (status = 200, description = "Backend is running", body = HomeResponse)
    )
)]
pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Backend is running!".to_string(),
        backend_url: state.base_url().to_string(),
    })
}

/// Backend URL for the front-end pages
#[utoipa::path(
    get,
    path = "/config",
    tag = "Configuration",
    summary = "Get front-end configuration",
    description = "Public base URL the pages should call, plus the token lifetime",
    responses(
        (status = 200, description = "Configuration retrieved successfully", body = BackendConfigResponse)
    )
)]
pub async fn get_config(State(state): State<AppState>) -> Json<BackendConfigResponse> {
    Json(BackendConfigResponse {
        backend_url: state.base_url().to_string(),
        token_ttl_seconds: state.config.session.ttl_seconds,
    })
}
