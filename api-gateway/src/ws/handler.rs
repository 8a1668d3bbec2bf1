//! WebSocket handler implementation
//!
//! Clients send `WsRequest`s and get one `WsResponse` per request. After a
//! `subscribe`, refresh-state updates arrive as `WsNotification`s whose
//! method is the update's topic.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use market_data::channel::{Subscription, Topic};
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::ws::message::{WsNotification, WsRequest, WsResponse};
use crate::AppState;

/// Handle WebSocket connection
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let client_id = Uuid::new_v4();
    info!("New WebSocket connection: {}", client_id);

    // Everything bound for the client goes through this channel
    let (tx, mut rx) = mpsc::channel::<String>(100);
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_sender.send(Message::Text(message)).await {
                error!("Error sending message: {}", e);
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    let mut session = ClientSession::new(state, tx.clone());

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                debug!("Received text message: {}", text);
                let response = session.handle_text(&text);
                if tx.send(encode(&response)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                debug!("Received close message");
                break;
            }
            Err(e) => {
                error!("Error receiving message: {}", e);
                break;
            }
            // Pings are answered by axum
            _ => {}
        }
    }

    info!("WebSocket connection closed: {}", client_id);
    session.close();
    send_task.abort();
}

/// Per-connection request handling and subscription bookkeeping
pub struct ClientSession {
    state: Arc<AppState>,
    outbound: mpsc::Sender<String>,
    subscriptions: HashMap<Uuid, Topic>,
}

impl ClientSession {
    /// Create a session whose notifications go to `outbound`
    pub fn new(state: Arc<AppState>, outbound: mpsc::Sender<String>) -> Self {
        Self {
            state,
            outbound,
            subscriptions: HashMap::new(),
        }
    }

    /// Parse and answer one text frame
    pub fn handle_text(&mut self, text: &str) -> WsResponse {
        match serde_json::from_str::<WsRequest>(text) {
            Ok(request) => self.dispatch(request),
            Err(e) => WsResponse::err("0".to_string(), 400, format!("Invalid request: {}", e)),
        }
    }

    /// Answer one request
    pub fn dispatch(&mut self, request: WsRequest) -> WsResponse {
        let WsRequest { id, method, params } = request;

        match method.as_str() {
            "subscribe" => self.subscribe(id, &params),
            "unsubscribe" => self.unsubscribe(id, &params),
            "getState" => match serde_json::to_value(self.state.controller.state()) {
                Ok(snapshot) => WsResponse::ok(id, snapshot),
                Err(e) => WsResponse::err(id, 500, format!("Error encoding state: {}", e)),
            },
            "refresh" => {
                self.state.controller.trigger_refresh();
                WsResponse::ok(id, json!({ "started": true }))
            }
            "retry" => {
                self.state.controller.trigger_retry();
                WsResponse::ok(id, json!({ "started": true }))
            }
            "ping" => WsResponse::ok(id, json!({ "pong": chrono::Utc::now().to_rfc3339() })),
            _ => WsResponse::err(id, 400, format!("Unknown method: {}", method)),
        }
    }

    /// Number of live subscriptions held by this client
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Drop every subscription held by this client
    pub fn close(&mut self) {
        let channel = self.state.controller.channel();
        for (id, _) in self.subscriptions.drain() {
            channel.unsubscribe_by_id(id);
        }
    }

    fn subscribe(&mut self, id: String, params: &serde_json::Value) -> WsResponse {
        let name = match params.get("channel").and_then(|c| c.as_str()) {
            Some(name) => name,
            None => return WsResponse::err(id, 400, "Missing or invalid channel parameter"),
        };
        let topic = match Topic::from_name(name) {
            Some(topic) => topic,
            None => return WsResponse::err(id, 400, format!("Invalid channel: {}", name)),
        };

        let subscription = self.state.controller.channel().subscribe(topic);
        let subscription_id = subscription.id;
        forward(subscription, self.outbound.clone());
        self.subscriptions.insert(subscription_id, topic);

        WsResponse::ok(
            id,
            json!({
                "subscriptionId": subscription_id,
                "channel": topic.name(),
            }),
        )
    }

    fn unsubscribe(&mut self, id: String, params: &serde_json::Value) -> WsResponse {
        let subscription_id = match params.get("subscriptionId").and_then(|s| s.as_str()) {
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(uuid) => uuid,
                Err(_) => return WsResponse::err(id, 400, "Invalid subscription ID"),
            },
            None => return WsResponse::err(id, 400, "Missing or invalid subscriptionId parameter"),
        };

        if self.subscriptions.remove(&subscription_id).is_none() {
            return WsResponse::err(id, 404, "Subscription not found");
        }

        // Dropping the sender ends the forwarding thread
        self.state.controller.channel().unsubscribe_by_id(subscription_id);
        WsResponse::ok(id, json!({ "unsubscribed": true }))
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Relay a subscription's updates to the client as notifications
///
/// The channel receiver blocks, so this runs on the blocking pool. It ends once
/// the subscription is removed from the channel or the client is gone.
fn forward(subscription: Subscription, outbound: mpsc::Sender<String>) {
    let Subscription { id, receiver } = subscription;

    tokio::task::spawn_blocking(move || {
        while let Ok(update) = receiver.recv() {
            let notification = WsNotification {
                method: update.topic().name().to_string(),
                params: json!({
                    "subscription_id": id.to_string(),
                    "data": &*update,
                }),
            };
            if outbound.blocking_send(encode(&notification)).is_err() {
                break;
            }
        }
        debug!("Subscription handler for {} exited", id);
    });
}

fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        error!("Error encoding WebSocket message: {}", e);
        "{}".to_string()
    })
}
