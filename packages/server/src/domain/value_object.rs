//! Value objects of the relay domain.

use std::fmt;

use rand::Rng;
use uuid::Uuid;

use super::{
    assistant::{ASSISTANT_ID, ASSISTANT_NAME},
    error::ValueObjectError,
};

/// Identifier of the well-known room that always exists.
pub const DEFAULT_ROOM_ID: &str = "general";

/// Display name of the default room.
pub const DEFAULT_ROOM_NAME: &str = "General";

/// Opaque identifier of one live connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    /// Allocate a fresh, unique connection id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The reserved identity of the assistant. Never registered as a connection.
    pub fn assistant() -> Self {
        Self(ASSISTANT_ID.to_string())
    }

    pub fn is_assistant(&self) -> bool {
        self.0 == ASSISTANT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Build a room id from caller input. Surrounding whitespace is dropped.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn generate() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self(format!("room-{}", &uuid[..8]))
    }

    pub fn default_room() -> Self {
        Self(DEFAULT_ROOM_ID.to_string())
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_ROOM_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human readable room name. Names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyRoomName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn default_room() -> Self {
        Self(DEFAULT_ROOM_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutable display name of a session. Collisions between sessions are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyDisplayName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Guest name derived from the first characters of a connection id.
    pub fn guest_for(id: &ConnectionId) -> Self {
        let tag: String = id
            .as_str()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(4)
            .collect();
        Self(format!("Guest-{}", tag.to_ascii_uppercase()))
    }

    /// Fixed display name of the assistant identity.
    pub fn assistant() -> Self {
        Self(ASSISTANT_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 24-bit RGB color rendered as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(u32);

impl Color {
    pub fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Pseudo-random color. No collision avoidance between sessions.
    pub fn random() -> Self {
        Self::from_rgb(rand::rng().random_range(0..=0x00FF_FFFF))
    }

    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
