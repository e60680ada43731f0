//! WebSocket envelope DTOs.
//!
//! Every frame is a JSON object tagged by its `type` field.

use serde::{Deserialize, Serialize};

use crate::domain::{ClientCommand, RelayEvent};

/// Client → server envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InboundMessage {
    Chat {
        text: String,
    },
    SetUsername {
        username: String,
    },
    JoinRoom {
        room_id: String,
    },
    CreateRoom {
        room_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
    },
    Typing {
        is_typing: bool,
    },
}

/// Server → client envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OutboundMessage {
    Welcome {
        user_id: String,
        username: String,
        color: String,
        room: String,
        message: String,
        rooms: Vec<RoomInfo>,
    },
    Message {
        user_id: String,
        username: String,
        color: String,
        text: String,
        timestamp: String,
        room_id: String,
    },
    Notification {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
    },
    UsersList {
        users: Vec<UserInfo>,
        room_id: String,
    },
    RoomCreated {
        room: RoomInfo,
    },
    RoomChanged {
        room_id: String,
        room_name: String,
    },
    UsernameChanged {
        username: String,
    },
    Typing {
        user_id: String,
        username: String,
        is_typing: bool,
        room_id: String,
    },
    Error {
        message: String,
    },
}

/// Room entry of the welcome snapshot and `roomCreated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub id: String,
    pub name: String,
    pub client_count: usize,
}

/// Presence list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub color: String,
}

/// Decode one inbound text frame.
pub fn decode_command(text: &str) -> Result<ClientCommand, serde_json::Error> {
    serde_json::from_str::<InboundMessage>(text).map(ClientCommand::from)
}

/// Encode one outbound envelope as a text frame.
pub fn encode_event(event: &RelayEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&OutboundMessage::from(event))
}
