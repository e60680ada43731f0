//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - 全接続への roomCreated 配信、作成者がルームに入らないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：ID 指定なし、ID 指定あり、空の ID 指定（未指定扱い）
//! - 異常系：既存 ID との衝突、空のルーム名

use std::sync::Arc;

use tertulia_shared::time::Clock;

use crate::domain::{ConnectionId, RelayError, RelayEvent, RoomId, RoomName, RoomSummary, Timestamp};

use super::{FanoutRouter, SharedRelayState};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    state: SharedRelayState,
    router: FanoutRouter,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(state: SharedRelayState, router: FanoutRouter, clock: Arc<dyn Clock>) -> Self {
        Self {
            state,
            router,
            clock,
        }
    }

    /// ルーム作成を実行
    ///
    /// 作成者は現在のルームに留まる。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSummary)` - 作成されたルーム（メンバー数 0）
    /// * `Err(RelayError::AlreadyExists)` - 指定された ID が既に使われている
    /// * `Err(RelayError::InvalidInput)` - 空のルーム名
    pub async fn execute(
        &self,
        creator: &ConnectionId,
        room_name: String,
        room_id: Option<String>,
    ) -> Result<RoomSummary, RelayError> {
        let name = RoomName::new(room_name)?;
        // 空の ID は未指定として扱う
        let id = room_id.and_then(|raw| RoomId::new(raw).ok());

        let mut state = self.state.lock().await;
        state.session(creator)?;
        let summary = state.create_room(name, id, Timestamp::new(self.clock.now_millis()))?;

        self.router
            .broadcast_all(&state, &RelayEvent::RoomCreated(summary.clone()))
            .await;

        tracing::info!(
            "Client '{}' created room '{}' ({})",
            creator,
            summary.name,
            summary.id
        );
        Ok(summary)
    }
}
