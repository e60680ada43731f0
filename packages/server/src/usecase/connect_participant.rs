//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - セッション登録、デフォルトルームへの参加、welcome 送信
//!
//! ### なぜこのテストが必要か
//! - welcome に識別子・色・ルーム一覧が含まれることを保証
//! - 参加通知が本人以外にだけ届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の接続、既存参加者がいる状態での接続

use crate::domain::{
    ASSISTANT_NAME, COMMAND_PREFIX, DisplayName, PusherChannel, RelayEvent, Session,
};

use super::{FanoutRouter, SharedRelayState};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    state: SharedRelayState,
    router: FanoutRouter,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(state: SharedRelayState, router: FanoutRouter) -> Self {
        Self { state, router }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 登録されたセッション（常に成功する）
    pub async fn execute(&self, sender: PusherChannel) -> Session {
        let mut state = self.state.lock().await;

        // 1. セッション登録とデフォルトルームへの参加
        let session = state.connect();

        // 2. 送信チャンネルを登録
        self.router
            .pusher()
            .register_client(session.id.clone(), sender)
            .await;

        // 3. 本人へ welcome（ルーム一覧のスナップショット付き）
        let welcome = RelayEvent::Welcome {
            session: session.clone(),
            greeting: greeting(&session.name),
            rooms: state.snapshot(),
        };
        self.router.send_to(&session.id, &welcome).await;

        // 4. ルームの他の参加者へ通知し、参加者リストを更新
        let joined = RelayEvent::notification(
            format!("{} has joined the chat", session.name),
            &session.room_id,
        );
        self.router
            .send_to_room(&state, &session.room_id, &joined, Some(&session.id))
            .await;
        self.router.publish_presence(&state, &session.room_id).await;

        // 5. 全接続のルーム一覧の人数を更新
        self.router
            .publish_room_counts(&state, &[&session.room_id])
            .await;

        tracing::info!(
            "Client '{}' connected as '{}' ({} online)",
            session.id,
            session.name,
            state.registry().len()
        );
        session
    }
}

fn greeting(name: &DisplayName) -> String {
    format!(
        "Welcome to the chat! You are {name}. Type {COMMAND_PREFIX} followed by a question \
         to ask the {ASSISTANT_NAME}."
    )
}
