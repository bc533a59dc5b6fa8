//! WebSocket relay server: axum handlers, the event loop and startup.

mod engine;
mod handler;
mod origin;
mod server;
mod signal;
pub mod state;

pub use engine::{ConnectionEvent, EventLoop};
pub use origin::is_origin_allowed;
pub use server::Server;
