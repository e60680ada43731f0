//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者のルームだけへの配信、アシスタントへの振り分け
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常メッセージ、`!gpt` 付きの質問
//! - エッジケース：空の質問（本人にだけヒント）、空メッセージ、未知の接続

use std::sync::Arc;

use tertulia_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::domain::{ChatLine, ConnectionId, RelayError, RelayEvent, Timestamp, parse_assistant_query};

use super::{AssistantBridge, FanoutRouter, SharedRelayState};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    state: SharedRelayState,
    router: FanoutRouter,
    bridge: AssistantBridge,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        state: SharedRelayState,
        router: FanoutRouter,
        bridge: AssistantBridge,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state,
            router,
            bridge,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(handle))` - アシスタントへの問い合わせタスクを開始した
    /// * `Ok(None)` - 通常のメッセージとして配信した（または空で無視した）
    /// * `Err(RelayError::InvalidState)` - 送信者のセッションが存在しない
    pub async fn execute(
        &self,
        from: &ConnectionId,
        text: &str,
    ) -> Result<Option<JoinHandle<()>>, RelayError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Ignoring empty chat message from '{}'", from);
            return Ok(None);
        }

        let state = self.state.lock().await;
        let session = state.session(from)?.clone();
        let query = parse_assistant_query(text);

        // 空の質問: 本人にだけ使い方を返し、ルームには何も流さない
        if query.is_some_and(str::is_empty) {
            self.bridge.send_usage_hint(&session).await;
            return Ok(None);
        }

        // 1. 送信者のルームへ配信（送信者自身にも届く）
        let line = ChatLine {
            from: session.id.clone(),
            username: session.name.clone(),
            color: session.color,
            text: text.to_string(),
            timestamp: Timestamp::new(self.clock.now_millis()),
            room_id: session.room_id.clone(),
        };
        self.router
            .send_to_room(&state, &session.room_id, &RelayEvent::Message(line), None)
            .await;
        tracing::debug!("Relayed message from '{}' in room '{}'", from, session.room_id);

        // 2. `!gpt` 付きならアシスタントに問い合わせる（応答は非同期）
        match query {
            Some(query) => Ok(Some(self.bridge.start(&state, &session.room_id, query).await)),
            None => Ok(None),
        }
    }
}
