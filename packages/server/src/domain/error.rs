//! Domain error types.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Rejections raised while constructing value objects from client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("text is empty after sanitization")]
    Empty,

    #[error("text must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// Errors reported by the connection registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("connection '{0}' is already registered")]
    AlreadyRegistered(ConnectionId),

    #[error("connection '{0}' already holds an identity")]
    AlreadyJoined(ConnectionId),

    #[error("invalid display name: {0}")]
    InvalidIdentity(#[from] ValueObjectError),
}

/// Errors reported by a [`MessagePusher`](super::MessagePusher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("failed to encode outbound event: {0}")]
    Serialization(String),
}
