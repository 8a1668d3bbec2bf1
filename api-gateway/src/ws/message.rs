//! WebSocket messages

use serde::{Deserialize, Serialize};

/// WebSocket request message
#[derive(Debug, Deserialize)]
pub struct WsRequest {
    /// Request ID
    pub id: String,
    /// Method
    pub method: String,
    /// Params
    #[serde(default)]
    pub params: serde_json::Value,
}

/// WebSocket response message
#[derive(Debug, Serialize)]
pub struct WsResponse {
    /// Request ID
    pub id: String,
    /// Result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<WsError>,
}

impl WsResponse {
    pub fn ok(id: String, result: serde_json::Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: String, code: i32, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(WsError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// WebSocket error
#[derive(Debug, Serialize)]
pub struct WsError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

/// WebSocket notification message
#[derive(Debug, Serialize)]
pub struct WsNotification {
    /// Method
    pub method: String,
    /// Params
    pub params: serde_json::Value,
}
