//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - ルームからの退出、セッション削除、退出通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と残りの参加者への通知
//! - エッジケース：最後の参加者の切断、同じ接続の二重切断

use crate::domain::{ConnectionId, RelayEvent, Session};

use super::{FanoutRouter, SharedRelayState};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    state: SharedRelayState,
    router: FanoutRouter,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(state: SharedRelayState, router: FanoutRouter) -> Self {
        Self { state, router }
    }

    /// 参加者切断を実行
    ///
    /// 切断はエラーではなく通常のライフサイクル遷移。未知の接続では何もしない。
    ///
    /// # Returns
    ///
    /// * `Some(Session)` - 削除されたセッション
    /// * `None` - 既に削除済み
    pub async fn execute(&self, client_id: &ConnectionId) -> Option<Session> {
        let mut state = self.state.lock().await;

        // 1. 送信チャンネルの登録解除（以後この接続には何も届かない）
        self.router.pusher().unregister_client(client_id).await;

        // 2. ルームから退出し、セッションを削除
        let session = state.disconnect(client_id)?;

        // 3. 残りの参加者へ通知し、参加者リストを更新
        let left = RelayEvent::notification(
            format!("{} has left the chat", session.name),
            &session.room_id,
        );
        self.router
            .send_to_room(&state, &session.room_id, &left, None)
            .await;
        self.router.publish_presence(&state, &session.room_id).await;

        // 4. 全接続のルーム一覧の人数を更新
        self.router
            .publish_room_counts(&state, &[&session.room_id])
            .await;

        tracing::info!(
            "Client '{}' ({}) disconnected ({} online)",
            session.id,
            session.name,
            state.registry().len()
        );
        Some(session)
    }
}
