//! WebSocket connection handlers.
//!
//! Each connection runs two tasks: one forwards inbound frames to the event
//! loop, the other pushes encoded outbound frames (and periodic pings) to the
//! socket. When either finishes the other is aborted and a close event is sent.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{
    sync::mpsc,
    time::{Instant, Interval, interval_at},
};

use crate::{
    domain::ConnectionId,
    ui::{engine::ConnectionEvent, origin::is_origin_allowed, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    // 非 UTF-8 の Origin は不一致として扱う
    let origin = headers
        .get(header::ORIGIN)
        .map(|value| value.to_str().unwrap_or_default());
    if !is_origin_allowed(state.allowed_origin.as_deref(), origin) {
        tracing::warn!("Refusing WebSocket upgrade from origin {:?}", origin);
        return Err(StatusCode::FORBIDDEN);
    }

    let max_frame_bytes = state.max_frame_bytes;
    Ok(ws
        .max_message_size(max_frame_bytes)
        .max_frame_size(max_frame_bytes)
        .on_upgrade(move |socket| handle_socket(socket, state)))
}

/// Spawns a task that receives encoded frames from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the channel is closed (the connection was unregistered) or
/// the socket refuses a write.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames broadcast to this connection
/// * `sender` - WebSocket sink for this connection
/// * `ping_interval` - Interval between pings, `None` to disable
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    ping_interval: Option<Duration>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = ping_interval.map(|period| interval_at(Instant::now() + period, period));
        loop {
            tokio::select! {
                frame = rx.recv() => {
                    let Some(frame) = frame else { break };
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                _ = next_tick(&mut ticker) => {
                    if sender.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    if state
        .events
        .send(ConnectionEvent::Connected {
            connection_id,
            sender: tx,
        })
        .is_err()
    {
        tracing::warn!("Event loop is gone, dropping connection '{}'", connection_id);
        return;
    }

    let (sender, mut receiver) = socket.split();

    // Spawn a task to forward frames from this client to the event loop
    let events = state.events.clone();
    let max_frame_bytes = state.max_frame_bytes;
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if text.len() > max_frame_bytes {
                        tracing::debug!(
                            "Dropping oversized frame ({} bytes) from '{}'",
                            text.len(),
                            connection_id
                        );
                        continue;
                    }
                    let event = ConnectionEvent::Frame {
                        connection_id,
                        text: text.as_str().to_owned(),
                    };
                    if events.send(event).is_err() {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Pong は無視、Ping には axum が自動で応答する。Binary は不正入力
                _ => {}
            }
        }
    });

    // Spawn a task to push broadcast frames to this client
    let mut send_task = pusher_loop(rx, sender, state.ping_interval);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state
        .events
        .send(ConnectionEvent::Closed { connection_id })
        .is_err()
    {
        tracing::warn!("Event loop is gone, could not clean up '{}'", connection_id);
    }
}
