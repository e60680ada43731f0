//! UseCase: 入力中インジケーター中継

use crate::domain::{ConnectionId, RelayError, RelayEvent};

use super::{FanoutRouter, SharedRelayState};

/// 入力中インジケーターのユースケース
pub struct SendTypingUseCase {
    state: SharedRelayState,
    router: FanoutRouter,
}

impl SendTypingUseCase {
    pub fn new(state: SharedRelayState, router: FanoutRouter) -> Self {
        Self { state, router }
    }

    /// 送信者のルームの他の参加者へ typing を中継する
    pub async fn execute(&self, id: &ConnectionId, is_typing: bool) -> Result<(), RelayError> {
        let state = self.state.lock().await;
        let session = state.session(id)?;

        let event = RelayEvent::Typing {
            user_id: session.id.clone(),
            username: session.name.clone(),
            is_typing,
            room_id: session.room_id.clone(),
        };
        self.router
            .send_to_room(&state, &session.room_id, &event, Some(&session.id))
            .await;
        Ok(())
    }
}
