//! Domain layer for the chat relay.
//!
//! Holds the connection registry, the room directory and the serialized
//! relay state, plus the seams (`MessagePusher`, `AssistantClient`) the
//! outer layers implement.

pub mod assistant;
pub mod command;
pub mod directory;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod registry;
pub mod state;
pub mod value_object;

pub use assistant::{
    ASSISTANT_COLOR, ASSISTANT_ID, ASSISTANT_NAME, AssistantClient, AssistantError,
    AssistantRequest, COMMAND_PREFIX, fallback_reply, parse_assistant_query, usage_hint,
};
pub use command::ClientCommand;
pub use directory::RoomDirectory;
pub use entity::{ChatLine, Participant, Room, RoomSummary, Session};
pub use error::{RelayError, ValueObjectError};
pub use event::RelayEvent;
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use state::{RelayState, RoomTransfer};
pub use value_object::{
    Color, ConnectionId, DEFAULT_ROOM_ID, DEFAULT_ROOM_NAME, DisplayName, RoomId, RoomName,
    Timestamp,
};
