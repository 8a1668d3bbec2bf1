//! Settings API handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use common::model::settings::{DisplayCurrency, Settings, SettingsUpdate};

use crate::api::response::{ApiListResponse, ApiResponse};
use crate::error::ApiError;
use crate::AppState;

/// Get display preferences
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Current preferences", body = Settings)
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Settings>, ApiError> {
    Ok(ApiResponse::new(state.settings.get().await?))
}

/// Change some display preferences
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = SettingsUpdate,
    responses(
        (status = 200, description = "Preferences updated", body = Settings),
        (status = 400, description = "Unsupported currency")
    ),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<ApiResponse<Settings>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::BadRequest("No settings to change".to_string()));
    }
    Ok(ApiResponse::new(state.settings.update(update).await?))
}

/// Restore default preferences
#[utoipa::path(
    post,
    path = "/api/v1/settings/reset",
    responses(
        (status = 200, description = "Preferences reset", body = Settings)
    ),
    tag = "settings"
)]
pub async fn reset_settings(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Settings>, ApiError> {
    Ok(ApiResponse::new(state.settings.reset().await?))
}

/// List selectable display currencies
#[utoipa::path(
    get,
    path = "/api/v1/settings/currencies",
    responses(
        (status = 200, description = "Currencies in menu order", body = [DisplayCurrency])
    ),
    tag = "settings"
)]
pub async fn get_currencies() -> ApiListResponse<DisplayCurrency> {
    ApiListResponse::new(DisplayCurrency::ALL.to_vec())
}
