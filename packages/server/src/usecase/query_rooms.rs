//! UseCase: ルーム情報の参照（HTTP API 向け）

use crate::domain::{Participant, RelayError, Room, RoomId, RoomSummary};

use super::SharedRelayState;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    state: SharedRelayState,
}

impl GetRoomsUseCase {
    pub fn new(state: SharedRelayState) -> Self {
        Self { state }
    }

    /// 作成順のルーム一覧
    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.state.lock().await.snapshot()
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    state: SharedRelayState,
}

impl GetRoomDetailUseCase {
    pub fn new(state: SharedRelayState) -> Self {
        Self { state }
    }

    /// ルームと、その参加者リスト
    ///
    /// # Returns
    ///
    /// * `Err(RelayError::NotFound)` - ルームが存在しない
    pub async fn execute(&self, room_id: String) -> Result<(Room, Vec<Participant>), RelayError> {
        let room_id = RoomId::new(room_id)?;
        let state = self.state.lock().await;
        let room = state
            .directory()
            .get(&room_id)
            .cloned()
            .ok_or_else(|| RelayError::NotFound(room_id.to_string()))?;
        let participants = state.presence(&room_id);
        Ok((room, participants))
    }
}
