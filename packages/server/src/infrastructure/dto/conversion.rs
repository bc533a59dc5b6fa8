//! Conversion logic between domain events and wire DTOs.

use chatter_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatEvent, DisplayName, ServerEvent, SystemNotice};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<ChatEvent> for dto::ChatMessage {
    fn from(model: ChatEvent) -> Self {
        Self {
            r#type: dto::MessageType::Chat,
            id: model.id.to_string(),
            username: model.from.into_string(),
            message: model.text.into_string(),
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

impl From<SystemNotice> for dto::SystemMessage {
    fn from(model: SystemNotice) -> Self {
        Self {
            r#type: dto::MessageType::System,
            message: model.message,
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

impl From<Vec<DisplayName>> for dto::UsersMessage {
    fn from(roster: Vec<DisplayName>) -> Self {
        Self {
            r#type: dto::MessageType::Users,
            users: roster.into_iter().map(DisplayName::into_string).collect(),
        }
    }
}

/// Encode an outbound event as the JSON text frame sent to clients.
pub fn encode_server_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    match event.clone() {
        ServerEvent::Roster(roster) => serde_json::to_string(&dto::UsersMessage::from(roster)),
        ServerEvent::Chat(chat) => serde_json::to_string(&dto::ChatMessage::from(chat)),
        ServerEvent::Notice(notice) => serde_json::to_string(&dto::SystemMessage::from(notice)),
    }
}
