use std::sync::Arc;
use std::time::Duration;

use api_gateway::ws::handler::ClientSession;
use api_gateway::AppState;
use common::model::market::MarketEntry;
use market_data::channel::Topic;
use market_data::{RefreshController, ScriptedFeed};
use serde_json::Value;
use settings_service::SettingsService;
use tokio::sync::mpsc;
use tokio::time::timeout;

async fn app_state() -> Arc<AppState> {
    let feed = Arc::new(ScriptedFeed::new(vec![
        MarketEntry::priced("bitcoin", 50000.0),
        MarketEntry::priced("ethereum", 2500.0),
    ]));
    let controller = RefreshController::start_with_period(feed, Duration::from_secs(300));
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

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

async fn next_message(rx: &mut mpsc::Receiver<String>) -> Value {
    let text = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for notification")
        .expect("outbound channel closed");
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_ping_and_unknown_method() {
    let (tx, _rx) = mpsc::channel(16);
    let mut session = ClientSession::new(app_state().await, tx);

    let response = to_json(&session.handle_text(r#"{"id":"1","method":"ping","params":{}}"#));
    assert_eq!(response["id"], "1");
    assert!(response["result"]["pong"].is_string());

    let response = to_json(&session.handle_text(r#"{"id":"2","method":"getOrderBook"}"#));
    assert_eq!(response["error"]["code"], 400);
    assert_eq!(response["error"]["message"], "Unknown method: getOrderBook");
}

#[tokio::test]
async fn test_malformed_frame_is_rejected() {
    let (tx, _rx) = mpsc::channel(16);
    let mut session = ClientSession::new(app_state().await, tx);

    let response = to_json(&session.handle_text("not json"));
    assert_eq!(response["id"], "0");
    assert_eq!(response["error"]["code"], 400);
}

#[tokio::test]
async fn test_get_state_returns_snapshot() {
    let (tx, _rx) = mpsc::channel(16);
    let mut session = ClientSession::new(app_state().await, tx);

    let response = to_json(&session.handle_text(r#"{"id":"7","method":"getState"}"#));
    assert_eq!(response["result"]["entries"].as_array().unwrap().len(), 2);
    assert_eq!(response["result"]["is_initial_loading"], false);
}

#[tokio::test]
async fn test_subscribe_validates_channel() {
    let (tx, _rx) = mpsc::channel(16);
    let mut session = ClientSession::new(app_state().await, tx);

    let response = to_json(&session.handle_text(r#"{"id":"1","method":"subscribe","params":{}}"#));
    assert_eq!(response["error"]["message"], "Missing or invalid channel parameter");

    let response = to_json(
        &session.handle_text(r#"{"id":"2","method":"subscribe","params":{"channel":"orderbook"}}"#),
    );
    assert_eq!(response["error"]["message"], "Invalid channel: orderbook");
    assert_eq!(session.subscription_count(), 0);
}

#[tokio::test]
async fn test_status_subscription_receives_refresh_updates() {
    let state = app_state().await;
    let (tx, mut rx) = mpsc::channel(16);
    let mut session = ClientSession::new(state.clone(), tx);

    let response = to_json(
        &session.handle_text(r#"{"id":"1","method":"subscribe","params":{"channel":"status"}}"#),
    );
    assert_eq!(response["result"]["channel"], "status");
    let subscription_id = response["result"]["subscriptionId"].as_str().unwrap().to_string();

    let response = to_json(&session.handle_text(r#"{"id":"2","method":"refresh"}"#));
    assert_eq!(response["result"]["started"], true);

    // Raised, then cleared when the fetch resolves
    let raised = next_message(&mut rx).await;
    assert_eq!(raised["method"], "status");
    assert_eq!(raised["params"]["subscription_id"], subscription_id.as_str());
    assert_eq!(raised["params"]["data"]["type"], "status");
    assert_eq!(raised["params"]["data"]["is_refreshing"], true);

    let cleared = next_message(&mut rx).await;
    assert_eq!(cleared["params"]["data"]["is_refreshing"], false);
}

#[tokio::test]
async fn test_unsubscribe_releases_channel_subscription() {
    let state = app_state().await;
    let channel = state.controller.channel();
    let (tx, _rx) = mpsc::channel(16);
    let mut session = ClientSession::new(state.clone(), tx);

    let response = to_json(
        &session.handle_text(r#"{"id":"1","method":"subscribe","params":{"channel":"snapshot"}}"#),
    );
    let subscription_id = response["result"]["subscriptionId"].as_str().unwrap().to_string();
    assert_eq!(channel.subscriber_count(Topic::Snapshot), 1);

    let request = format!(
        r#"{{"id":"2","method":"unsubscribe","params":{{"subscriptionId":"{}"}}}}"#,
        subscription_id
    );
    let response = to_json(&session.handle_text(&request));
    assert_eq!(response["result"]["unsubscribed"], true);
    assert_eq!(channel.subscriber_count(Topic::Snapshot), 0);

    // Second time round it is gone
    let response = to_json(&session.handle_text(&request));
    assert_eq!(response["error"]["code"], 404);
}

#[tokio::test]
async fn test_close_drops_every_subscription() {
    let state = app_state().await;
    let channel = state.controller.channel();
    let (tx, _rx) = mpsc::channel(16);
    let mut session = ClientSession::new(state.clone(), tx);

    session.handle_text(r#"{"id":"1","method":"subscribe","params":{"channel":"all"}}"#);
    session.handle_text(r#"{"id":"2","method":"subscribe","params":{"channel":"status"}}"#);
    assert_eq!(session.subscription_count(), 2);

    drop(session);

    assert_eq!(channel.subscriber_count(Topic::All), 0);
    assert_eq!(channel.subscriber_count(Topic::Status), 0);
}
