//! MessagePusher trait 定義
//!
//! 接続中のクライアントへエンベロープを届ける通信層のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{event::RelayEvent, value_object::ConnectionId};

/// クライアントごとの送信チャンネル（シリアライズ済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// 送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to encode envelope: {0}")]
    EncodeFailed(String),
}

/// MessagePusher trait
///
/// 1 クライアントに対する送信は呼び出し順に届く（チャンネルの FIFO 性による）。
/// 送信先が閉じている場合のエラーは呼び出し側で握りつぶしてよい。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// 送信チャンネルを登録解除（未登録でも何もしない）
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定のクライアントへ送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントへ送信（一部の送信失敗は許容）
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;
}
