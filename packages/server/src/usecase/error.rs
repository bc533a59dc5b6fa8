//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{ConnectionId, RepositoryError, ValueObjectError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection '{0}' is already registered")]
    AlreadyRegistered(ConnectionId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("connection '{0}' is not registered")]
    NotConnected(ConnectionId),

    #[error("connection '{0}' has already joined")]
    AlreadyJoined(ConnectionId),

    #[error("invalid display name: {0}")]
    InvalidName(ValueObjectError),
}

impl From<RepositoryError> for JoinError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ConnectionNotFound(id) | RepositoryError::AlreadyRegistered(id) => {
                Self::NotConnected(id)
            }
            RepositoryError::AlreadyJoined(id) => Self::AlreadyJoined(id),
            RepositoryError::InvalidIdentity(e) => Self::InvalidName(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("connection '{0}' has not joined")]
    NotJoined(ConnectionId),

    #[error("rate limit exceeded, retry after {retry_after_millis} ms")]
    RateLimited { retry_after_millis: i64 },

    #[error("message is empty after sanitization")]
    EmptyMessage,

    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}
