//! Health and API documentation

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::response::ApiResponse;
use crate::{ApiDoc, AppState};

/// Service health
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    /// Always "ok" while the server answers
    pub status: String,
    /// Whether any fetch has succeeded yet
    pub has_data: bool,
    /// Whether the refresh timer is scheduled
    pub refreshing_periodically: bool,
    /// Time of the last successful fetch
    pub last_updated: Option<DateTime<Utc>>,
    /// Most recent fetch error
    pub last_error: Option<String>,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthData)
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> ApiResponse<HealthData> {
    let snapshot = state.controller.state();
    ApiResponse::new(HealthData {
        status: "ok".to_string(),
        has_data: snapshot.has_data(),
        refreshing_periodically: state.controller.is_running(),
        last_updated: snapshot.last_updated,
        last_error: snapshot.last_error,
    })
}

/// OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
