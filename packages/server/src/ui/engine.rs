//! Single-consumer event loop.
//!
//! Every connection task forwards its transport events (connect, text frame,
//! close) into one channel. The loop handles them strictly one at a time, so a
//! registry change and the fan-out it triggers complete before the next event
//! is looked at. Events from one connection keep their arrival order because
//! each connection is the only producer of its own events.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, PusherChannel},
    infrastructure::dto::websocket::{ClientMessage, coerce_text},
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, JoinParticipantUseCase,
        SendMessageError, SendMessageUseCase,
    },
};

/// Transport event forwarded by a connection task.
#[derive(Debug)]
pub enum ConnectionEvent {
    Connected {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    Frame {
        connection_id: ConnectionId,
        text: String,
    },
    Closed {
        connection_id: ConnectionId,
    },
}

pub struct EventLoop {
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    join_participant_usecase: Arc<JoinParticipantUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    max_frame_bytes: usize,
}

impl EventLoop {
    /// Create the loop and the sender that connection tasks feed.
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        join_participant_usecase: Arc<JoinParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        max_frame_bytes: usize,
    ) -> (Self, mpsc::UnboundedSender<ConnectionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_loop = Self {
            events: rx,
            connect_participant_usecase,
            join_participant_usecase,
            send_message_usecase,
            disconnect_participant_usecase,
            max_frame_bytes,
        };
        (event_loop, tx)
    }

    /// Process events until every sender has been dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.handle(event).await;
        }
        tracing::debug!("Event loop stopped");
    }

    /// Handle a single event to completion.
    pub async fn handle(&self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected {
                connection_id,
                sender,
            } => {
                match self
                    .connect_participant_usecase
                    .execute(connection_id, sender)
                    .await
                {
                    Ok(_) => tracing::info!("Connection '{}' opened", connection_id),
                    Err(e) => tracing::warn!("Failed to register connection: {}", e),
                }
            }
            ConnectionEvent::Frame {
                connection_id,
                text,
            } => self.on_frame(connection_id, &text).await,
            ConnectionEvent::Closed { connection_id } => {
                match self
                    .disconnect_participant_usecase
                    .execute(connection_id)
                    .await
                {
                    Some(name) => {
                        tracing::info!("Connection '{}' ({}) closed", connection_id, name)
                    }
                    None => tracing::info!("Connection '{}' closed", connection_id),
                }
            }
        }
    }

    async fn on_frame(&self, connection_id: ConnectionId, text: &str) {
        if text.len() > self.max_frame_bytes {
            tracing::debug!(
                "Dropping oversized frame ({} bytes) from '{}'",
                text.len(),
                connection_id
            );
            return;
        }

        let Some(message) = ClientMessage::parse(text) else {
            tracing::debug!("Dropping malformed frame from '{}'", connection_id);
            return;
        };

        match message {
            ClientMessage::Join { username } => {
                match self
                    .join_participant_usecase
                    .execute(&connection_id, coerce_text(&username))
                    .await
                {
                    Ok(name) => tracing::info!("Connection '{}' joined as '{}'", connection_id, name),
                    Err(e) => tracing::debug!("Join from '{}' rejected: {}", connection_id, e),
                }
            }
            ClientMessage::Chat { message, .. } => {
                match self
                    .send_message_usecase
                    .execute(&connection_id, coerce_text(&message))
                    .await
                {
                    Ok(_) => {}
                    Err(SendMessageError::BroadcastFailed(e)) => {
                        tracing::warn!("Chat from '{}' not delivered: {}", connection_id, e)
                    }
                    Err(e) => tracing::debug!("Chat from '{}' rejected: {}", connection_id, e),
                }
            }
        }
    }
}
