//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::usecase::{GetRoomDetailUseCase, GetRoomsUseCase, ProtocolDispatcher};

pub struct AppState {
    /// ProtocolDispatcher（WebSocket リクエストの振り分け）
    pub dispatcher: Arc<ProtocolDispatcher>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
