//! UseCase: 表示名変更処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SetUsernameUseCase::execute() メソッド
//! - 本人への確認、ルームへの通知、参加者リストの更新
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常の名前変更、既存の名前と同じ名前への変更
//! - 異常系：空の名前

use crate::domain::{ConnectionId, DisplayName, RelayError, RelayEvent};

use super::{FanoutRouter, SharedRelayState};

/// 表示名変更のユースケース
pub struct SetUsernameUseCase {
    state: SharedRelayState,
    router: FanoutRouter,
}

impl SetUsernameUseCase {
    /// 新しい SetUsernameUseCase を作成
    pub fn new(state: SharedRelayState, router: FanoutRouter) -> Self {
        Self { state, router }
    }

    /// 表示名変更を実行
    ///
    /// 表示名の一意性は要求しない。
    ///
    /// # Returns
    ///
    /// * `Ok(DisplayName)` - 新しい表示名
    /// * `Err(RelayError::InvalidInput)` - 空の名前
    pub async fn execute(
        &self,
        id: &ConnectionId,
        username: String,
    ) -> Result<DisplayName, RelayError> {
        let name = DisplayName::new(username)?;

        let mut state = self.state.lock().await;
        let (previous, session) = state.rename(id, name)?;

        // 1. 本人に確認を返す
        let changed = RelayEvent::UsernameChanged {
            username: session.name.clone(),
        };
        self.router.send_to(&session.id, &changed).await;

        // 2. ルームの他の参加者へ通知し、参加者リストを更新
        let notice = RelayEvent::notification(
            format!("{} is now known as {}", previous, session.name),
            &session.room_id,
        );
        self.router
            .send_to_room(&state, &session.room_id, &notice, Some(&session.id))
            .await;
        self.router.publish_presence(&state, &session.room_id).await;

        tracing::info!("Client '{}' renamed '{}' -> '{}'", id, previous, session.name);
        Ok(session.name)
    }
}
