//! Outbound envelopes produced by the relay.

use super::{
    entity::{ChatLine, Participant, RoomSummary, Session},
    value_object::{ConnectionId, DisplayName, RoomId, RoomName},
};

/// One envelope delivered to a connection. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Welcome {
        session: Session,
        greeting: String,
        rooms: Vec<RoomSummary>,
    },
    Message(ChatLine),
    Notification {
        message: String,
        room_id: Option<RoomId>,
    },
    UsersList {
        users: Vec<Participant>,
        room_id: RoomId,
    },
    RoomCreated(RoomSummary),
    RoomChanged {
        room_id: RoomId,
        room_name: RoomName,
    },
    UsernameChanged {
        username: DisplayName,
    },
    Typing {
        user_id: ConnectionId,
        username: DisplayName,
        is_typing: bool,
        room_id: RoomId,
    },
    Error {
        message: String,
    },
}

impl RelayEvent {
    pub fn notification(message: impl Into<String>, room_id: &RoomId) -> Self {
        Self::Notification {
            message: message.into(),
            room_id: Some(room_id.clone()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Wire discriminator of this envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::Message(_) => "message",
            Self::Notification { .. } => "notification",
            Self::UsersList { .. } => "usersList",
            Self::RoomCreated(_) => "roomCreated",
            Self::RoomChanged { .. } => "roomChanged",
            Self::UsernameChanged { .. } => "usernameChanged",
            Self::Typing { .. } => "typing",
            Self::Error { .. } => "error",
        }
    }
}
