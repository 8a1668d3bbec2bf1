//! Market API handlers
//!
//! Handlers for the refreshed market snapshot:
//! - Current state, optionally filtered by a search term
//! - Overview stats
//! - Single entry lookup
//! - Manual refresh and retry

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use common::error::Error;
use common::format::format_time_ago;
use common::model::market::{MarketEntry, MarketStats};
use market_data::{filter_entries, RefreshState};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::api::response::{ApiResponse, ResponseMetadata};
use crate::error::ApiError;
use crate::AppState;

/// Market list query parameters
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MarketsQuery {
    /// Case-insensitive match on name or symbol
    #[serde(default)]
    pub search: Option<String>,
}

/// Get the current snapshot
#[utoipa::path(
    get,
    path = "/api/v1/markets",
    params(
        ("search" = Option<String>, Query, description = "Filter by name or symbol")
    ),
    responses(
        (status = 200, description = "Current entries and loading flags", body = RefreshState)
    ),
    tag = "market"
)]
pub async fn get_markets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MarketsQuery>,
) -> Result<ApiResponse<RefreshState>, ApiError> {
    let mut snapshot = state.controller.state();
    let total = snapshot.entries.len();
    let term = query.search.unwrap_or_default();

    if !term.trim().is_empty() {
        snapshot.entries = filter_entries(&snapshot.entries, &term)
            .into_iter()
            .cloned()
            .collect();
    }

    let updated = snapshot
        .last_updated
        .map(|at| format_time_ago(at, Utc::now()));
    let meta = ResponseMetadata::extra(json!({
        "total": total,
        "matched": snapshot.entries.len(),
        "updated": updated,
    }));
    Ok(ApiResponse::with_metadata(snapshot, meta))
}

/// Get the market overview
#[utoipa::path(
    get,
    path = "/api/v1/markets/stats",
    responses(
        (status = 200, description = "Market cap total, gainers and losers", body = MarketStats)
    ),
    tag = "market"
)]
pub async fn get_market_stats(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<MarketStats>, ApiError> {
    Ok(ApiResponse::new(state.controller.state().stats()))
}

/// Get one entry by id
#[utoipa::path(
    get,
    path = "/api/v1/markets/{id}",
    params(
        ("id" = String, Path, description = "Asset id, e.g. bitcoin")
    ),
    responses(
        (status = 200, description = "Entry found", body = MarketEntry),
        (status = 404, description = "Entry not in the current snapshot")
    ),
    tag = "market"
)]
pub async fn get_market(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<MarketEntry>, ApiError> {
    let snapshot = state.controller.state();
    let entry = snapshot
        .entry(&id)
        .cloned()
        .ok_or(Error::NotFound(id))?;

    Ok(ApiResponse::new(entry))
}

/// Start a background refresh
#[utoipa::path(
    post,
    path = "/api/v1/markets/refresh",
    responses(
        (status = 202, description = "Refresh started; entries stay visible", body = RefreshState)
    ),
    tag = "market"
)]
pub async fn refresh_markets(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, ApiResponse<RefreshState>) {
    info!("Manual refresh requested");
    state.controller.trigger_refresh();
    (StatusCode::ACCEPTED, ApiResponse::new(state.controller.state()))
}

/// Retry loading after an error
#[utoipa::path(
    post,
    path = "/api/v1/markets/retry",
    responses(
        (status = 202, description = "Retry started with full loading state", body = RefreshState)
    ),
    tag = "market"
)]
pub async fn retry_markets(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, ApiResponse<RefreshState>) {
    info!("Retry requested");
    state.controller.trigger_retry();
    (StatusCode::ACCEPTED, ApiResponse::new(state.controller.state()))
}
