//! Assistant bridge: answers `!gpt` queries without blocking the relay.
//!
//! The typing indicator goes out under the caller's lock. The external call
//! then runs in its own task and re-enters the relay through the shared
//! state lock to publish the reply and stop the indicator. If the asker
//! leaves in the meantime the reply simply reaches whoever is still in the
//! room.

use std::{sync::Arc, time::Duration};

use tertulia_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::domain::{
    ASSISTANT_COLOR, AssistantClient, AssistantError, AssistantRequest, ChatLine,
    Color, ConnectionId, DisplayName, RelayEvent, RelayState, RoomId, Session, Timestamp,
    fallback_reply, usage_hint,
};

use super::{FanoutRouter, SharedRelayState};

/// Limits applied to every assistant request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantSettings {
    /// Upper bound on the external call, on top of the HTTP client's own timeout.
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_tokens: 500,
        }
    }
}

#[derive(Clone)]
pub struct AssistantBridge {
    state: SharedRelayState,
    router: FanoutRouter,
    /// `None` selects fallback-only mode for the whole process.
    client: Option<Arc<dyn AssistantClient>>,
    clock: Arc<dyn Clock>,
    settings: AssistantSettings,
}

impl AssistantBridge {
    pub fn new(
        state: SharedRelayState,
        router: FanoutRouter,
        client: Option<Arc<dyn AssistantClient>>,
        clock: Arc<dyn Clock>,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            state,
            router,
            client,
            clock,
            settings,
        }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    /// Reply privately to an empty query. No typing indicator, no room traffic.
    pub async fn send_usage_hint(&self, session: &Session) {
        let hint = RelayEvent::Message(self.line(usage_hint(), &session.room_id));
        self.router.send_to(&session.id, &hint).await;
    }

    /// Start answering `query` in `room_id`.
    ///
    /// Must be called with the relay state locked; the returned task takes
    /// the lock again once the answer is ready.
    pub async fn start(&self, state: &RelayState, room_id: &RoomId, query: &str) -> JoinHandle<()> {
        self.router
            .send_to_room(state, room_id, &typing(true, room_id), None)
            .await;

        let bridge = self.clone();
        let room_id = room_id.clone();
        let query = query.to_string();
        tokio::spawn(async move {
            let reply = bridge.answer(&query).await;
            bridge.finish(&room_id, reply).await;
        })
    }

    /// Ask the external assistant, degrading to a canned reply on any failure.
    pub async fn answer(&self, query: &str) -> String {
        let Some(client) = &self.client else {
            return fallback_reply(query, self.clock.now_millis());
        };

        let request = AssistantRequest::new(query, self.settings.max_tokens);
        let outcome = match tokio::time::timeout(self.settings.timeout, client.ask(request)).await {
            Ok(Ok(reply)) if !reply.trim().is_empty() => Ok(reply.trim().to_string()),
            Ok(Ok(_)) => Err(AssistantError::EmptyReply),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AssistantError::Timeout(self.settings.timeout)),
        };

        outcome.unwrap_or_else(|e| {
            tracing::warn!("Assistant unavailable, using fallback reply: {}", e);
            fallback_reply(query, self.clock.now_millis())
        })
    }

    async fn finish(&self, room_id: &RoomId, reply: String) {
        let state = self.state.lock().await;
        let message = RelayEvent::Message(self.line(reply, room_id));
        self.router
            .send_to_room(&state, room_id, &message, None)
            .await;
        self.router
            .send_to_room(&state, room_id, &typing(false, room_id), None)
            .await;
        tracing::debug!("Assistant answered in room '{}'", room_id);
    }

    fn line(&self, text: String, room_id: &RoomId) -> ChatLine {
        ChatLine {
            from: ConnectionId::assistant(),
            username: DisplayName::assistant(),
            color: Color::from_rgb(ASSISTANT_COLOR),
            text,
            timestamp: Timestamp::new(self.clock.now_millis()),
            room_id: room_id.clone(),
        }
    }
}

fn typing(is_typing: bool, room_id: &RoomId) -> RelayEvent {
    RelayEvent::Typing {
        user_id: ConnectionId::assistant(),
        username: DisplayName::assistant(),
        is_typing,
        room_id: room_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assistant::MockAssistantClient;
    use crate::usecase::testing::Fixture;
    use async_trait::async_trait;

    struct SlowAssistant;

    #[async_trait]
    impl AssistantClient for SlowAssistant {
        async fn ask(&self, _request: AssistantRequest) -> Result<String, AssistantError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn bridge(fixture: &Fixture, client: Option<Arc<dyn AssistantClient>>) -> AssistantBridge {
        AssistantBridge::new(
            fixture.state.clone(),
            fixture.router.clone(),
            client,
            fixture.clock.clone(),
            AssistantSettings {
                timeout: Duration::from_millis(100),
                max_tokens: 64,
            },
        )
    }

    #[tokio::test]
    async fn test_answer_uses_external_reply() {
        // テスト項目: 外部アシスタントの応答がそのまま使われる
        // given (前提条件):
        let fixture = Fixture::new();
        let mut mock = MockAssistantClient::new();
        mock.expect_ask()
            .withf(|request| request.query == "what is rust?" && request.max_tokens == 64)
            .times(1)
            .returning(|_| Ok(" A language. ".to_string()));
        let bridge = bridge(&fixture, Some(Arc::new(mock)));

        // when (操作):
        let reply = bridge.answer("what is rust?").await;

        // then (期待する結果):
        assert!(bridge.is_online());
        assert_eq!(reply, "A language.");
    }

    #[tokio::test]
    async fn test_answer_falls_back_on_error_and_empty_reply() {
        // テスト項目: 外部呼び出しの失敗・空応答ではフォールバック応答になる
        // given (前提条件):
        let fixture = Fixture::new();
        let mut failing = MockAssistantClient::new();
        failing
            .expect_ask()
            .returning(|_| Err(AssistantError::Status { status: 500, body: "boom".to_string() }));
        let mut empty = MockAssistantClient::new();
        empty.expect_ask().returning(|_| Ok("   ".to_string()));

        // when (操作):
        let from_error = bridge(&fixture, Some(Arc::new(failing))).answer("hello").await;
        let from_empty = bridge(&fixture, Some(Arc::new(empty))).answer("hello").await;

        // then (期待する結果):
        assert_eq!(from_error, fallback_reply("hello", crate::usecase::testing::NOW));
        assert_eq!(from_empty, from_error);
    }

    #[tokio::test]
    async fn test_answer_falls_back_on_timeout() {
        // テスト項目: タイムアウトした場合もフォールバック応答になる
        // given (前提条件):
        let fixture = Fixture::new();
        let bridge = bridge(&fixture, Some(Arc::new(SlowAssistant)));

        // when (操作):
        let started = std::time::Instant::now();
        let reply = bridge.answer("tell me a joke").await;

        // then (期待する結果):
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(reply, fallback_reply("tell me a joke", crate::usecase::testing::NOW));
    }

    #[tokio::test]
    async fn test_start_emits_typing_reply_and_stop_to_the_room() {
        // テスト項目: typing 開始 → 応答メッセージ → typing 終了の順でルームに届く
        // given (前提条件):
        let fixture = Fixture::new();
        let alice = fixture.connect().await;
        let bob = fixture.connect().await;
        let bridge = bridge(&fixture, None);

        // when (操作):
        let handle = {
            let state = fixture.state.lock().await;
            bridge.start(&state, &alice.room_id, "hello").await
        };
        handle.await.unwrap();

        // then (期待する結果):
        for member in [&alice, &bob] {
            let events = fixture.pusher.events_for(&member.id);
            assert_eq!(events.len(), 3);
            assert!(matches!(
                &events[0],
                RelayEvent::Typing { user_id, is_typing: true, .. } if user_id.is_assistant()
            ));
            match &events[1] {
                RelayEvent::Message(line) => {
                    assert!(line.from.is_assistant());
                    assert_eq!(line.username.as_str(), "GPT Assistant");
                    assert_eq!(line.color.to_hex(), "#10A37F");
                    assert!(!line.text.is_empty());
                    assert_eq!(line.room_id, alice.room_id);
                }
                other => panic!("expected message, got {other:?}"),
            }
            assert!(matches!(&events[2], RelayEvent::Typing { is_typing: false, .. }));
        }
    }

    #[tokio::test]
    async fn test_slow_answer_does_not_hold_the_relay_lock() {
        // テスト項目: 外部呼び出し中もリレーの状態ロックは解放されている
        // given (前提条件):
        let fixture = Fixture::new();
        let alice = fixture.connect().await;
        let bridge = AssistantBridge::new(
            fixture.state.clone(),
            fixture.router.clone(),
            Some(Arc::new(SlowAssistant)),
            fixture.clock.clone(),
            AssistantSettings {
                timeout: Duration::from_millis(300),
                max_tokens: 64,
            },
        );

        // when (操作):
        let handle = {
            let state = fixture.state.lock().await;
            bridge.start(&state, &alice.room_id, "hello").await
        };
        let lock = tokio::time::timeout(Duration::from_millis(100), fixture.state.lock()).await;

        // then (期待する結果):
        assert!(lock.is_ok());
        drop(lock);
        handle.await.unwrap();
        assert_eq!(fixture.pusher.count_of("message"), 1);
    }

    #[tokio::test]
    async fn test_usage_hint_goes_to_sender_only() {
        // テスト項目: 使い方のヒントは本人にだけ、アシスタント名義で届く
        // given (前提条件):
        let fixture = Fixture::new();
        let alice = fixture.connect().await;
        let _bob = fixture.connect().await;
        let bridge = bridge(&fixture, None);

        // when (操作):
        bridge.send_usage_hint(&alice).await;

        // then (期待する結果):
        assert_eq!(fixture.pusher.recipients_of("message"), vec![alice.id.clone()]);
        assert_eq!(fixture.pusher.count_of("typing"), 0);
        assert!(!bridge.is_online());
    }
}
