use std::sync::Arc;
use std::time::Duration;

use api_gateway::{router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::model::market::MarketEntry;
use http_body_util::BodyExt;
use market_data::{RefreshController, ScriptedFeed};
use serde_json::{json, Value};
use settings_service::SettingsService;
use tower::ServiceExt;

fn entry(id: &str, name: &str, symbol: &str, price: f64, change_24h: f64) -> MarketEntry {
    let mut entry = MarketEntry::priced(id, price);
    entry.name = name.to_string();
    entry.symbol = symbol.to_string();
    entry.price_change_percentage_24h = change_24h;
    entry.market_cap = price * 1000.0;
    entry
}

fn sample_entries() -> Vec<MarketEntry> {
    vec![
        entry("bitcoin", "Bitcoin", "btc", 50000.0, 2.5),
        entry("ethereum", "Ethereum", "eth", 2500.0, -1.0),
        entry("tether", "Tether", "usdt", 1.0, 0.0),
    ]
}

async fn app_state(feed: Arc<ScriptedFeed>) -> Arc<AppState> {
    let controller = RefreshController::start_with_period(feed, Duration::from_secs(300));

    // Let the initial fetch land
    for _ in 0..50 {
        if !controller.state().is_initial_loading {
            break;
        }
        tokio::task::yield_now().await;
    }

    Arc::new(AppState {
        controller: Arc::new(controller),
        settings: Arc::new(SettingsService::new()),
    })
}

async fn ready_state() -> Arc<AppState> {
    app_state(Arc::new(ScriptedFeed::new(sample_entries()))).await
}

async fn send(state: Arc<AppState>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    send(state, "GET", uri, None).await
}

#[tokio::test]
async fn test_health_reports_loaded_snapshot() {
    let (status, body) = get(ready_state().await, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["has_data"], true);
    assert_eq!(body["data"]["refreshing_periodically"], true);
}

#[tokio::test]
async fn test_markets_returns_state_in_upstream_order() {
    let (status, body) = get(ready_state().await, "/api/v1/markets").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["data"]["entries"].as_array().unwrap();
    let ids: Vec<_> = entries.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["bitcoin", "ethereum", "tether"]);
    assert_eq!(body["data"]["is_initial_loading"], false);
    assert_eq!(body["data"]["is_refreshing"], false);
    assert_eq!(body["data"]["last_error"], Value::Null);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["updated"], "Just now");
    assert!(body["meta"]["request_id"].is_string());
    // Wire name of the 7d field is kept
    assert!(entries[0].get("price_change_percentage_7d_in_currency").is_some());
}

#[tokio::test]
async fn test_markets_search_filters_by_name_or_symbol() {
    let state = ready_state().await;

    let (_, body) = get(state.clone(), "/api/v1/markets?search=ETH").await;
    assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["entries"][0]["id"], "ethereum");
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["matched"], 1);

    let (_, body) = get(state, "/api/v1/markets?search=teth").await;
    assert_eq!(body["data"]["entries"][0]["id"], "tether");
}

#[tokio::test]
async fn test_market_stats() {
    let (status, body) = get(ready_state().await, "/api/v1/markets/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["gainers"], 1);
    assert_eq!(body["data"]["losers"], 1);
    assert_eq!(body["data"]["total_market_cap"], 52501000.0);
}

#[tokio::test]
async fn test_single_market_lookup() {
    let state = ready_state().await;

    let (status, body) = get(state.clone(), "/api/v1/markets/bitcoin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current_price"], 50000.0);

    let (status, body) = get(state, "/api/v1/markets/doge").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "market_not_found");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_refresh_is_accepted_with_refreshing_flag() {
    let state = ready_state().await;

    let (status, body) = send(state.clone(), "POST", "/api/v1/markets/refresh", None).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["is_refreshing"], true);
    assert_eq!(body["data"]["is_initial_loading"], false);
    // Entries stay visible during a refresh
    assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_failed_initial_load_then_retry() {
    let feed = Arc::new(ScriptedFeed::new(sample_entries()));
    feed.push_err("connection refused");
    let state = app_state(feed).await;

    let (_, body) = get(state.clone(), "/api/v1/markets").await;
    assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["last_error"], "Network error: connection refused");

    let (_, health) = get(state.clone(), "/health").await;
    assert_eq!(health["data"]["has_data"], false);

    let (status, body) = send(state.clone(), "POST", "/api/v1/markets/retry", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["is_initial_loading"], true);
    assert_eq!(body["data"]["last_error"], Value::Null);
}

#[tokio::test]
async fn test_convert_at_current_prices() {
    let state = ready_state().await;

    let (status, body) = get(state.clone(), "/api/v1/convert?from=bitcoin&to=ethereum&amount=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], 20.0);
    assert_eq!(body["data"]["result_text"], "20.00000000");
    assert_eq!(body["data"]["rate"], "20.000000");
    assert_eq!(body["data"]["resolved"], true);

    // Defaults are one bitcoin in ethereum
    let (_, body) = get(state, "/api/v1/convert").await;
    assert_eq!(body["data"]["from"], "bitcoin");
    assert_eq!(body["data"]["to"], "ethereum");
    assert_eq!(body["data"]["result_text"], "20.00000000");
}

#[tokio::test]
async fn test_convert_falls_back_to_zero() {
    let state = ready_state().await;

    let (status, body) = get(state.clone(), "/api/v1/convert?from=doge&to=ethereum&amount=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], 0.0);
    assert_eq!(body["data"]["resolved"], false);

    let (_, body) = get(state, "/api/v1/convert?from=bitcoin&to=ethereum&amount=abc").await;
    assert_eq!(body["data"]["amount"], 0.0);
    assert_eq!(body["data"]["result_text"], "0.00000000");
}

#[tokio::test]
async fn test_settings_round_trip() {
    let state = ready_state().await;

    let (status, body) = get(state.clone(), "/api/v1/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"notifications": false, "dark_mode": false, "currency": "USD"}));

    let (status, body) = send(
        state.clone(),
        "PUT",
        "/api/v1/settings",
        Some(json!({"currency": "eur", "dark_mode": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currency"], "EUR");
    assert_eq!(body["data"]["dark_mode"], true);

    let (_, body) = get(state.clone(), "/api/v1/settings").await;
    assert_eq!(body["data"]["currency"], "EUR");

    let (status, body) = send(state, "POST", "/api/v1/settings/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currency"], "USD");
    assert_eq!(body["data"]["dark_mode"], false);
}

#[tokio::test]
async fn test_settings_rejects_bad_updates() {
    let state = ready_state().await;

    let (status, body) = send(
        state.clone(),
        "PUT",
        "/api/v1/settings",
        Some(json!({"currency": "JPY", "notifications": true})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, body) = send(state.clone(), "PUT", "/api/v1/settings", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    // Nothing was applied
    let (_, body) = get(state, "/api/v1/settings").await;
    assert_eq!(body["data"]["notifications"], false);
}

#[tokio::test]
async fn test_currencies_in_menu_order() {
    let (_, body) = get(ready_state().await, "/api/v1/settings/currencies").await;
    assert_eq!(body["data"], json!(["USD", "EUR", "GBP", "BTC", "ETH"]));
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let (status, body) = get(ready_state().await, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/markets"].is_object());
    assert!(body["paths"]["/api/v1/convert"].is_object());
    assert!(body["components"]["schemas"]["MarketEntry"].is_object());
}
