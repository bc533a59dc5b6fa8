//! Shared state handed to the axum handlers.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

use crate::usecase::GetRosterUseCase;

use super::engine::ConnectionEvent;

/// Shared application state
pub struct AppState {
    /// 接続タスクからイベントループへの送信口
    pub events: mpsc::UnboundedSender<ConnectionEvent>,
    /// GetRosterUseCase（診断用ロスター取得）
    pub get_roster_usecase: Arc<GetRosterUseCase>,
    /// 許可する Origin（`None` は制限なし）
    pub allowed_origin: Option<String>,
    /// 受信フレームの最大バイト数
    pub max_frame_bytes: usize,
    /// ping 送信間隔（`None` は無効）
    pub ping_interval: Option<Duration>,
}
