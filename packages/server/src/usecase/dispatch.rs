//! Protocol dispatcher: routes decoded client requests to their use case.
//!
//! A failed request is answered with an `error` envelope to its sender
//! only. Nothing else changes.

use std::sync::Arc;

use tertulia_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::domain::{ClientCommand, ConnectionId, PusherChannel, RelayError, RelayEvent, Session};

use super::{
    AssistantBridge, ConnectParticipantUseCase, CreateRoomUseCase, DisconnectParticipantUseCase,
    FanoutRouter, JoinRoomUseCase, SendMessageUseCase, SendTypingUseCase, SetUsernameUseCase,
    SharedRelayState,
};

pub struct ProtocolDispatcher {
    router: FanoutRouter,
    connect_participant_usecase: ConnectParticipantUseCase,
    disconnect_participant_usecase: DisconnectParticipantUseCase,
    send_message_usecase: SendMessageUseCase,
    set_username_usecase: SetUsernameUseCase,
    join_room_usecase: JoinRoomUseCase,
    create_room_usecase: CreateRoomUseCase,
    send_typing_usecase: SendTypingUseCase,
}

impl ProtocolDispatcher {
    pub fn new(
        state: SharedRelayState,
        router: FanoutRouter,
        clock: Arc<dyn Clock>,
        bridge: AssistantBridge,
    ) -> Self {
        Self {
            connect_participant_usecase: ConnectParticipantUseCase::new(
                state.clone(),
                router.clone(),
            ),
            disconnect_participant_usecase: DisconnectParticipantUseCase::new(
                state.clone(),
                router.clone(),
            ),
            send_message_usecase: SendMessageUseCase::new(
                state.clone(),
                router.clone(),
                bridge,
                clock.clone(),
            ),
            set_username_usecase: SetUsernameUseCase::new(state.clone(), router.clone()),
            join_room_usecase: JoinRoomUseCase::new(state.clone(), router.clone()),
            create_room_usecase: CreateRoomUseCase::new(state.clone(), router.clone(), clock),
            send_typing_usecase: SendTypingUseCase::new(state, router.clone()),
            router,
        }
    }

    /// Register a new connection and send its welcome.
    pub async fn connect(&self, sender: PusherChannel) -> Session {
        self.connect_participant_usecase.execute(sender).await
    }

    /// Tear down a connection. Safe to call more than once.
    pub async fn disconnect(&self, id: &ConnectionId) -> Option<Session> {
        self.disconnect_participant_usecase.execute(id).await
    }

    /// Handle one request from `id`.
    ///
    /// Returns the assistant task when the request started one.
    pub async fn dispatch(&self, id: &ConnectionId, command: ClientCommand) -> Option<JoinHandle<()>> {
        let kind = command.kind();
        let outcome: Result<Option<JoinHandle<()>>, RelayError> = match command {
            ClientCommand::Chat { text } => self.send_message_usecase.execute(id, &text).await,
            ClientCommand::SetUsername { username } => self
                .set_username_usecase
                .execute(id, username)
                .await
                .map(|_| None),
            ClientCommand::JoinRoom { room_id } => self
                .join_room_usecase
                .execute(id, room_id)
                .await
                .map(|_| None),
            ClientCommand::CreateRoom { room_name, room_id } => self
                .create_room_usecase
                .execute(id, room_name, room_id)
                .await
                .map(|_| None),
            ClientCommand::Typing { is_typing } => self
                .send_typing_usecase
                .execute(id, is_typing)
                .await
                .map(|_| None),
        };

        match outcome {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!("Rejected '{}' from '{}': {}", kind, id, e);
                self.router.send_to(id, &RelayEvent::error(e.to_string())).await;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::{AssistantSettings, testing::{Fixture, detached_channel}};

    fn dispatcher(fixture: &Fixture) -> ProtocolDispatcher {
        let bridge = AssistantBridge::new(
            fixture.state.clone(),
            fixture.router.clone(),
            None,
            fixture.clock.clone(),
            AssistantSettings::default(),
        );
        ProtocolDispatcher::new(
            fixture.state.clone(),
            fixture.router.clone(),
            fixture.clock.clone(),
            bridge,
        )
    }

    #[tokio::test]
    async fn test_failed_request_sends_error_to_sender_only() {
        // テスト項目: 存在しないルームへの移動は本人にだけ error が返る
        // given (前提条件):
        let fixture = Fixture::new();
        let dispatcher = dispatcher(&fixture);
        let alice = dispatcher.connect(detached_channel()).await;
        let bob = dispatcher.connect(detached_channel()).await;
        fixture.pusher.clear();

        // when (操作):
        let task = dispatcher
            .dispatch(&alice.id, ClientCommand::JoinRoom { room_id: "nowhere".to_string() })
            .await;

        // then (期待する結果):
        assert!(task.is_none());
        assert_eq!(fixture.pusher.recipients_of("error"), vec![alice.id.clone()]);
        assert!(fixture.pusher.events_for(&bob.id).is_empty());
        match &fixture.pusher.events_for(&alice.id)[0] {
            RelayEvent::Error { message } => assert!(message.contains("nowhere")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_with_prefix_returns_assistant_task() {
        // テスト項目: `!gpt` 付きのチャットはアシスタントのタスクを返す
        // given (前提条件):
        let fixture = Fixture::new();
        let dispatcher = dispatcher(&fixture);
        let alice = dispatcher.connect(detached_channel()).await;
        fixture.pusher.clear();

        // when (操作):
        let task = dispatcher
            .dispatch(&alice.id, ClientCommand::Chat { text: "!gpt hello".to_string() })
            .await;

        // then (期待する結果):
        task.expect("assistant task").await.unwrap();
        assert_eq!(fixture.pusher.count_of("message"), 2);
        assert_eq!(fixture.pusher.count_of("typing"), 2);
    }

    #[tokio::test]
    async fn test_full_session_keeps_state_consistent() {
        // テスト項目: 一連の操作と切断の後も状態が一貫している
        // given (前提条件):
        let fixture = Fixture::new();
        let dispatcher = dispatcher(&fixture);
        let alice = dispatcher.connect(detached_channel()).await;
        let bob = dispatcher.connect(detached_channel()).await;

        // when (操作):
        dispatcher
            .dispatch(
                &alice.id,
                ClientCommand::CreateRoom {
                    room_name: "Lounge".to_string(),
                    room_id: Some("lounge".to_string()),
                },
            )
            .await;
        dispatcher
            .dispatch(&bob.id, ClientCommand::JoinRoom { room_id: "lounge".to_string() })
            .await;
        dispatcher
            .dispatch(&bob.id, ClientCommand::SetUsername { username: "Bob".to_string() })
            .await;
        dispatcher
            .dispatch(&bob.id, ClientCommand::Typing { is_typing: true })
            .await;
        dispatcher.disconnect(&bob.id).await;
        dispatcher.disconnect(&bob.id).await;

        // then (期待する結果):
        assert_eq!(fixture.pusher.count_of("error"), 0);
        let state = fixture.state.lock().await;
        assert!(state.is_consistent());
        assert_eq!(state.registry().len(), 1);
        let rooms = state.snapshot();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[1].member_count, 0);
    }
}
