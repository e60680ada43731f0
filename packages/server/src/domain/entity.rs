//! Entities of the relay domain.

use std::collections::BTreeSet;

use super::value_object::{Color, ConnectionId, DisplayName, RoomId, RoomName, Timestamp};

/// The registry's record of one connection's chat identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: ConnectionId,
    pub name: DisplayName,
    /// Assigned at connect time, stable for the session lifetime.
    pub color: Color,
    /// Always references an existing room.
    pub room_id: RoomId,
}

/// A named message-scoping group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    pub members: BTreeSet<ConnectionId>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, name: RoomName, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            members: BTreeSet::new(),
            created_at,
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            member_count: self.members.len(),
        }
    }
}

/// Point-in-time view of a room for directory listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: RoomName,
    pub member_count: usize,
}

impl RoomSummary {
    /// User count shown to clients: live membership plus the assistant.
    pub fn display_count(&self) -> usize {
        self.member_count + 1
    }
}

/// One entry of a room's presence list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: DisplayName,
    pub color: Color,
}

impl From<&Session> for Participant {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            name: session.name.clone(),
            color: session.color,
        }
    }
}

/// A chat message as delivered to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub from: ConnectionId,
    pub username: DisplayName,
    pub color: Color,
    pub text: String,
    pub timestamp: Timestamp,
    pub room_id: RoomId,
}
