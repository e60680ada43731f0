//! Conversion logic between DTOs and domain types.

use tertulia_shared::time::timestamp_to_rfc3339;

use crate::domain::{ClientCommand, Participant, RelayEvent, Room, RoomSummary};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::InboundMessage> for ClientCommand {
    fn from(dto: dto::InboundMessage) -> Self {
        match dto {
            dto::InboundMessage::Chat { text } => Self::Chat { text },
            dto::InboundMessage::SetUsername { username } => Self::SetUsername { username },
            dto::InboundMessage::JoinRoom { room_id } => Self::JoinRoom { room_id },
            dto::InboundMessage::CreateRoom { room_name, room_id } => {
                Self::CreateRoom { room_name, room_id }
            }
            dto::InboundMessage::Typing { is_typing } => Self::Typing { is_typing },
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&RoomSummary> for dto::RoomInfo {
    fn from(summary: &RoomSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name.to_string(),
            client_count: summary.member_count,
        }
    }
}

impl From<&Participant> for dto::UserInfo {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.to_string(),
            username: participant.name.to_string(),
            color: participant.color.to_hex(),
        }
    }
}

impl From<&RoomSummary> for http::RoomSummaryDto {
    fn from(summary: &RoomSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name.to_string(),
            member_count: summary.member_count,
            display_count: summary.display_count(),
        }
    }
}

impl http::RoomDetailDto {
    pub fn from_room(room: &Room, users: &[Participant]) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name.to_string(),
            users: users.iter().map(dto::UserInfo::from).collect(),
            display_count: room.summary().display_count(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&RelayEvent> for dto::OutboundMessage {
    fn from(event: &RelayEvent) -> Self {
        match event {
            RelayEvent::Welcome {
                session,
                greeting,
                rooms,
            } => Self::Welcome {
                user_id: session.id.to_string(),
                username: session.name.to_string(),
                color: session.color.to_hex(),
                room: session.room_id.to_string(),
                message: greeting.clone(),
                rooms: rooms.iter().map(dto::RoomInfo::from).collect(),
            },
            RelayEvent::Message(line) => Self::Message {
                user_id: line.from.to_string(),
                username: line.username.to_string(),
                color: line.color.to_hex(),
                text: line.text.clone(),
                timestamp: timestamp_to_rfc3339(line.timestamp.value()),
                room_id: line.room_id.to_string(),
            },
            RelayEvent::Notification { message, room_id } => Self::Notification {
                message: message.clone(),
                room_id: room_id.as_ref().map(ToString::to_string),
            },
            RelayEvent::UsersList { users, room_id } => Self::UsersList {
                users: users.iter().map(dto::UserInfo::from).collect(),
                room_id: room_id.to_string(),
            },
            RelayEvent::RoomCreated(summary) => Self::RoomCreated {
                room: summary.into(),
            },
            RelayEvent::RoomChanged { room_id, room_name } => Self::RoomChanged {
                room_id: room_id.to_string(),
                room_name: room_name.to_string(),
            },
            RelayEvent::UsernameChanged { username } => Self::UsernameChanged {
                username: username.to_string(),
            },
            RelayEvent::Typing {
                user_id,
                username,
                is_typing,
                room_id,
            } => Self::Typing {
                user_id: user_id.to_string(),
                username: username.to_string(),
                is_typing: *is_typing,
                room_id: room_id.to_string(),
            },
            RelayEvent::Error { message } => Self::Error {
                message: message.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChatLine, Color, ConnectionId, DisplayName, RoomId, RoomName, Session, Timestamp,
    };

    fn alice() -> Session {
        Session {
            id: ConnectionId::new("alice-id".to_string()).unwrap(),
            name: DisplayName::new("alice".to_string()).unwrap(),
            color: Color::from_rgb(0xFF0000),
            room_id: RoomId::default_room(),
        }
    }

    #[test]
    fn test_welcome_event_to_dto() {
        // テスト項目: Welcome イベントがルーム一覧付きの DTO に変換される
        // given (前提条件):
        let event = RelayEvent::Welcome {
            session: alice(),
            greeting: "Welcome!".to_string(),
            rooms: vec![RoomSummary {
                id: RoomId::default_room(),
                name: RoomName::default_room(),
                member_count: 1,
            }],
        };

        // when (操作):
        let dto = dto::OutboundMessage::from(&event);

        // then (期待する結果):
        assert_eq!(
            dto,
            dto::OutboundMessage::Welcome {
                user_id: "alice-id".to_string(),
                username: "alice".to_string(),
                color: "#FF0000".to_string(),
                room: "general".to_string(),
                message: "Welcome!".to_string(),
                rooms: vec![dto::RoomInfo {
                    id: "general".to_string(),
                    name: "General".to_string(),
                    client_count: 1,
                }],
            }
        );
    }

    #[test]
    fn test_message_event_formats_timestamp() {
        // テスト項目: Message イベントのタイムスタンプが ISO 8601 文字列になる
        // given (前提条件):
        let session = alice();
        let event = RelayEvent::Message(ChatLine {
            from: session.id,
            username: session.name,
            color: session.color,
            text: "Hello!".to_string(),
            timestamp: Timestamp::new(1672531200000),
            room_id: session.room_id,
        });

        // when (操作):
        let dto = dto::OutboundMessage::from(&event);

        // then (期待する結果):
        match dto {
            dto::OutboundMessage::Message {
                text,
                timestamp,
                room_id,
                ..
            } => {
                assert_eq!(text, "Hello!");
                assert_eq!(timestamp, "2023-01-01T00:00:00.000Z");
                assert_eq!(room_id, "general");
            }
            other => panic!("unexpected dto: {other:?}"),
        }
    }

    #[test]
    fn test_summary_to_http_dto_counts_assistant() {
        // テスト項目: HTTP のルーム概要はアシスタント分 +1 した表示人数を持つ
        // given (前提条件):
        let summary = RoomSummary {
            id: RoomId::default_room(),
            name: RoomName::default_room(),
            member_count: 2,
        };

        // when (操作):
        let dto = http::RoomSummaryDto::from(&summary);

        // then (期待する結果):
        assert_eq!(dto.member_count, 2);
        assert_eq!(dto.display_count, 3);
    }
}
