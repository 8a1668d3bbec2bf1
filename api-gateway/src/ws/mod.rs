//! WebSocket push of refresh-state updates

pub mod handler;
pub mod message;
