//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{debug_roster, health_check};
pub use websocket::websocket_handler;
