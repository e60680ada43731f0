//! UseCase: ルーム移動処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 旧ルームと新ルームへの通知、本人への roomChanged、両ルームの参加者リスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：別のルームへの移動
//! - エッジケース：既にいるルームへの移動（何も起きない）
//! - 異常系：存在しないルーム、空のルーム ID

use crate::domain::{ConnectionId, RelayError, RelayEvent, RoomId};

use super::{FanoutRouter, SharedRelayState};

/// ルーム移動のユースケース
pub struct JoinRoomUseCase {
    state: SharedRelayState,
    router: FanoutRouter,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(state: SharedRelayState, router: FanoutRouter) -> Self {
        Self { state, router }
    }

    /// ルーム移動を実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 移動した
    /// * `Ok(false)` - 既にそのルームにいた（何も配信しない）
    /// * `Err(RelayError::NotFound)` - ルームが存在しない
    pub async fn execute(&self, id: &ConnectionId, room_id: String) -> Result<bool, RelayError> {
        let target = RoomId::new(room_id)?;

        let mut state = self.state.lock().await;
        let Some(transfer) = state.transfer(id, &target)? else {
            tracing::debug!("Client '{}' is already in room '{}'", id, target);
            return Ok(false);
        };
        let session = &transfer.session;

        // 1. 旧ルームの残りの参加者へ通知
        let left = RelayEvent::notification(
            format!("{} has left the room", session.name),
            &transfer.from,
        );
        self.router
            .send_to_room(&state, &transfer.from, &left, Some(&session.id))
            .await;

        // 2. 本人に移動先を伝える
        let changed = RelayEvent::RoomChanged {
            room_id: transfer.to.clone(),
            room_name: transfer.room_name.clone(),
        };
        self.router.send_to(&session.id, &changed).await;

        // 3. 新ルームの既存参加者へ通知
        let joined = RelayEvent::notification(
            format!("{} has joined the room", session.name),
            &transfer.to,
        );
        self.router
            .send_to_room(&state, &transfer.to, &joined, Some(&session.id))
            .await;

        // 4. 両ルームの参加者リストを更新
        self.router.publish_presence(&state, &transfer.from).await;
        self.router.publish_presence(&state, &transfer.to).await;

        // 5. 全接続のルーム一覧の人数を更新
        self.router
            .publish_room_counts(&state, &[&transfer.from, &transfer.to])
            .await;

        tracing::info!(
            "Client '{}' moved from '{}' to '{}'",
            session.id,
            transfer.from,
            transfer.to
        );
        Ok(true)
    }
}
