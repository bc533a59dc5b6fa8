//! WebSocket frame DTOs.
//!
//! Inbound frames are JSON objects discriminated by `type`. Field values are kept
//! as raw JSON so that non-string input can be coerced to empty text instead of
//! failing the whole frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client → server frames.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Join {
        #[serde(default)]
        username: Value,
    },
    Chat {
        /// Echoed by clients, ignored by the server.
        #[serde(default)]
        username: Value,
        #[serde(default)]
        message: Value,
    },
}

impl ClientMessage {
    /// Parse a text frame. Unparseable JSON and unknown or missing `type`
    /// discriminators yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

/// Coerce a JSON field to text. Anything other than a string is empty.
pub fn coerce_text(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

/// Server → client message type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Users,
    Chat,
    System,
}

/// Roster snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersMessage {
    pub r#type: MessageType,
    pub users: Vec<String>,
}

/// Accepted chat event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub r#type: MessageType,
    pub id: String,
    pub username: String,
    pub message: String,
    /// RFC 3339 (UTC)
    pub timestamp: String,
}

/// Join/leave notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMessage {
    pub r#type: MessageType,
    pub message: String,
    /// RFC 3339 (UTC)
    pub timestamp: String,
}
