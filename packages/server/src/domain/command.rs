//! Inbound client requests, decoded from the wire.

/// One request a connected client can make.
///
/// Field values are raw client input; validation happens in the use cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Chat { text: String },
    SetUsername { username: String },
    JoinRoom { room_id: String },
    CreateRoom { room_name: String, room_id: Option<String> },
    Typing { is_typing: bool },
}

impl ClientCommand {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::SetUsername { .. } => "setUsername",
            Self::JoinRoom { .. } => "joinRoom",
            Self::CreateRoom { .. } => "createRoom",
            Self::Typing { .. } => "typing",
        }
    }
}
