//! UseCase layer: relay state transitions and their fan-out.
//!
//! Every use case locks the shared `RelayState`, applies one transition and
//! hands the resulting envelopes to the `FanoutRouter` before releasing the
//! lock. Deliveries therefore reach each connection in the order the
//! transitions happened.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::RelayState;

pub mod assistant_bridge;
pub mod connect_participant;
pub mod create_room;
pub mod disconnect_participant;
pub mod dispatch;
pub mod fanout;
pub mod join_room;
pub mod query_rooms;
pub mod send_message;
pub mod send_typing;
pub mod set_username;

#[cfg(test)]
pub(crate) mod testing;

pub use assistant_bridge::{AssistantBridge, AssistantSettings};
pub use connect_participant::ConnectParticipantUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use dispatch::ProtocolDispatcher;
pub use fanout::FanoutRouter;
pub use join_room::JoinRoomUseCase;
pub use query_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use send_message::SendMessageUseCase;
pub use send_typing::SendTypingUseCase;
pub use set_username::SetUsernameUseCase;

/// The single serialized mutation boundary of the relay.
pub type SharedRelayState = Arc<Mutex<RelayState>>;
