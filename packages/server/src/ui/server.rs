//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRosterUseCase,
        JoinParticipantUseCase, SendMessageUseCase,
    },
};

use super::{
    engine::EventLoop,
    handler::{debug_roster, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     join_participant_usecase,
///     send_message_usecase,
///     disconnect_participant_usecase,
///     get_roster_usecase,
///     ServerConfig::default(),
/// );
/// server.run().await?;
/// ```
pub struct Server {
    /// ConnectParticipantUseCase（接続のユースケース）
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// JoinParticipantUseCase（join のユースケース）
    join_participant_usecase: Arc<JoinParticipantUseCase>,
    /// SendMessageUseCase（チャット送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectParticipantUseCase（切断のユースケース）
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// GetRosterUseCase（診断用ロスター取得のユースケース）
    get_roster_usecase: Arc<GetRosterUseCase>,
    config: ServerConfig,
}

impl Server {
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        join_participant_usecase: Arc<JoinParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        get_roster_usecase: Arc<GetRosterUseCase>,
        config: ServerConfig,
    ) -> Self {
        Self {
            connect_participant_usecase,
            join_participant_usecase,
            send_message_usecase,
            disconnect_participant_usecase,
            get_roster_usecase,
            config,
        }
    }

    /// Build the router and the event loop that serves it.
    ///
    /// The loop must be spawned for WebSocket connections to make progress.
    pub fn into_parts(self) -> (Router, EventLoop) {
        let (event_loop, events) = EventLoop::new(
            self.connect_participant_usecase,
            self.join_participant_usecase,
            self.send_message_usecase,
            self.disconnect_participant_usecase,
            self.config.max_frame_bytes,
        );

        let app_state = Arc::new(AppState {
            events,
            get_roster_usecase: self.get_roster_usecase,
            allowed_origin: self.config.origin_restriction().map(str::to_string),
            max_frame_bytes: self.config.max_frame_bytes,
            ping_interval: (self.config.ping_interval_secs > 0)
                .then(|| Duration::from_secs(self.config.ping_interval_secs)),
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/api/health", get(health_check))
            .route("/debug/roster", get(debug_roster))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        (app, event_loop)
    }

    /// Run the server on the configured host and port until a shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the address cannot be
    /// bound, or serving fails.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        self.config.validate()?;

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let (app, event_loop) = self.into_parts();
        let event_loop_task = tokio::spawn(event_loop.run());

        let local_addr = listener.local_addr()?;
        tracing::info!("Chat relay server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        event_loop_task.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
