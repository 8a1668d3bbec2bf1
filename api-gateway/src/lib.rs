//! HTTP and WebSocket front for the crypto tracker
//!
//! Serves the refresh controller's snapshot, conversions against it and the
//! display preferences. All JSON bodies are wrapped as `{ "data": ... }`.

pub mod api;
pub mod config;
pub mod error;
pub mod ws;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use market_data::RefreshController;
use settings_service::SettingsService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;

use crate::api::{convert, market, settings, system};
use crate::ws::handler::ws_handler;

pub use config::AppConfig;
pub use error::ApiError;

/// App state shared across handlers
pub struct AppState {
    /// Owner of the market snapshot
    pub controller: Arc<RefreshController>,
    /// Display preferences
    pub settings: Arc<SettingsService>,
}

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // System routes
        api::system::health,
        // Market routes
        api::market::get_markets,
        api::market::get_market_stats,
        api::market::get_market,
        api::market::refresh_markets,
        api::market::retry_markets,
        // Convert routes
        api::convert::convert,
        // Settings routes
        api::settings::get_settings,
        api::settings::update_settings,
        api::settings::reset_settings,
        api::settings::get_currencies,
    ),
    components(
        schemas(
            common::model::market::MarketEntry,
            common::model::market::MarketStats,
            common::model::settings::Settings,
            common::model::settings::SettingsUpdate,
            common::model::settings::DisplayCurrency,
            market_data::RefreshState,
            api::market::MarketsQuery,
            api::convert::ConvertQuery,
            api::convert::ConversionData,
            api::system::HealthData,
        )
    ),
    tags(
        (name = "system", description = "Health and documentation"),
        (name = "market", description = "Market snapshot endpoints"),
        (name = "convert", description = "Currency conversion"),
        (name = "settings", description = "Display preferences")
    ),
    info(
        title = "Crypto Tracker API",
        version = "1.0.0",
        description = "Top cryptocurrencies by market cap, refreshed periodically, with conversion and display preferences"
    )
)]
pub struct ApiDoc;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    router_with_log_level(state, Level::INFO)
}

/// Build the application router, tracing requests at `log_level`
pub fn router_with_log_level(state: Arc<AppState>, log_level: Level) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Market routes
        .route("/markets", get(market::get_markets))
        .route("/markets/stats", get(market::get_market_stats))
        .route("/markets/refresh", post(market::refresh_markets))
        .route("/markets/retry", post(market::retry_markets))
        .route("/markets/:id", get(market::get_market))
        // Convert routes
        .route("/convert", get(convert::convert))
        // Settings routes
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/settings/reset", post(settings::reset_settings))
        .route("/settings/currencies", get(settings::get_currencies));

    Router::new()
        .route("/health", get(system::health))
        .route("/api-docs/openapi.json", get(system::openapi_json))
        .route("/ws", get(ws_handler))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(log_level))
                .on_request(DefaultOnRequest::new().level(log_level))
                .on_response(DefaultOnResponse::new().level(log_level)),
        )
        .with_state(state)
}
