//! Outbound events fanned out to connections.

use super::{
    entity::{ChatEvent, SystemNotice},
    value_object::DisplayName,
};

/// Everything the server ever sends to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Roster snapshot after a membership change.
    Roster(Vec<DisplayName>),
    Chat(ChatEvent),
    Notice(SystemNotice),
}

impl ServerEvent {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Roster(_) => "users",
            Self::Chat(_) => "chat",
            Self::Notice(_) => "system",
        }
    }
}
