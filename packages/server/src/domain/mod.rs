//! Domain layer: value objects, entities, the connection registry aggregate
//! and the interfaces (traits) the outer layers implement.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod rate_limit;
pub mod registry;
pub mod repository;
pub mod sanitize;
pub mod value_object;

pub use entity::{ChatEvent, Connection, SystemNotice};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::ServerEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimitWindow};
pub use registry::ConnectionRegistry;
pub use repository::ConnectionRepository;
pub use value_object::{ChatEventId, ConnectionId, DisplayName, MessageText, Timestamp};
