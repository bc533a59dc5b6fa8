//! Real-time chat relay server.
//!
//! Clients join with a display name and every accepted chat, roster change and
//! join/leave notice is broadcast to all open connections.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatter-server
//! cargo run --bin chatter-server -- --host 0.0.0.0 --port 3000 --allowed-origin https://chat.example.com
//! ```

use std::{collections::HashMap, sync::Arc};

use chatter_server::{
    config::ServerConfig,
    domain::ConnectionRegistry,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRepository,
    },
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRosterUseCase,
        JoinParticipantUseCase, SendMessageUseCase,
    },
};
use chatter_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "chatter-server")]
#[command(about = "Real-time chat relay over WebSocket", long_about = None)]
#[command(version)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "CHATTER_HOST")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080", env = "CHATTER_PORT")]
    port: u16,

    /// Origin allowed to open WebSocket connections ("*" allows any)
    #[arg(long, env = "CHATTER_ALLOWED_ORIGIN")]
    allowed_origin: Option<String>,

    /// Maximum inbound WebSocket frame size in bytes
    #[arg(long, default_value = "16384", env = "CHATTER_MAX_FRAME_BYTES")]
    max_frame_bytes: usize,

    /// Accepted chat messages per window per connection
    #[arg(long, default_value = "30", env = "CHATTER_RATE_LIMIT_MESSAGES")]
    rate_limit_messages: u32,

    /// Rate-limit window length in seconds
    #[arg(long, default_value = "10", env = "CHATTER_RATE_LIMIT_WINDOW_SECS")]
    rate_limit_window_secs: u64,

    /// Interval between WebSocket pings in seconds. 0 = disabled
    #[arg(long, default_value = "30", env = "CHATTER_PING_INTERVAL_SECS")]
    ping_interval_secs: u64,

    /// Do not broadcast "<name> joined" / "<name> left" notices
    #[arg(long, env = "CHATTER_NO_SYSTEM_NOTICES")]
    no_system_notices: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info", env = "CHATTER_LOG_LEVEL")]
    log_level: String,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            allowed_origin: args.allowed_origin.clone(),
            max_frame_bytes: args.max_frame_bytes,
            rate_limit_max_messages: args.rate_limit_messages,
            rate_limit_window_secs: args.rate_limit_window_secs,
            ping_interval_secs: args.ping_interval_secs,
            system_notices: !args.no_system_notices,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(&args);
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    let clock = Arc::new(SystemClock);

    // 1. Create Repository (in-memory registry)
    let registry = Arc::new(Mutex::new(ConnectionRegistry::with_chat_policy(
        config.chat_policy(),
    )));
    let repository = Arc::new(InMemoryConnectionRepository::new(registry));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let join_participant_usecase = Arc::new(
        JoinParticipantUseCase::new(repository.clone(), message_pusher.clone(), clock.clone())
            .with_announcements(config.system_notices),
    );
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(
        DisconnectParticipantUseCase::new(repository.clone(), message_pusher.clone(), clock)
            .with_announcements(config.system_notices),
    );
    let get_roster_usecase = Arc::new(GetRosterUseCase::new(repository));

    // 4. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        join_participant_usecase,
        send_message_usecase,
        disconnect_participant_usecase,
        get_roster_usecase,
        config,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
