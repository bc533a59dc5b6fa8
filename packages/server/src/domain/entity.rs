//! Domain entities.

use super::{
    rate_limit::RateLimitWindow,
    value_object::{ChatEventId, ConnectionId, DisplayName, MessageText, Timestamp},
};

/// One accepted transport link, tracked by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    /// Set once on the first valid join, never replaced.
    pub identity: Option<DisplayName>,
    pub connected_at: Timestamp,
    pub rate_limit: RateLimitWindow,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            identity: None,
            connected_at,
            rate_limit: RateLimitWindow::new(),
        }
    }

    pub fn is_joined(&self) -> bool {
        self.identity.is_some()
    }

    /// Milliseconds the connection has been open at `now`.
    pub fn session_millis(&self, now: Timestamp) -> i64 {
        (now.value() - self.connected_at.value()).max(0)
    }
}

/// An accepted chat submission. Broadcast once, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub id: ChatEventId,
    pub from: DisplayName,
    pub text: MessageText,
    pub timestamp: Timestamp,
}

impl ChatEvent {
    /// Create an event with a freshly generated id.
    pub fn new(from: DisplayName, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            id: ChatEventId::generate(),
            from,
            text,
            timestamp,
        }
    }
}

/// Server-authored join/leave announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNotice {
    pub message: String,
    pub timestamp: Timestamp,
}

impl SystemNotice {
    pub fn joined(name: &DisplayName, timestamp: Timestamp) -> Self {
        Self {
            message: format!("{} joined", name),
            timestamp,
        }
    }

    pub fn left(name: &DisplayName, timestamp: Timestamp) -> Self {
        Self {
            message: format!("{} left", name),
            timestamp,
        }
    }
}
