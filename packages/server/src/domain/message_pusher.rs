//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）を抽象化します。
//! 送信可否の判定（`is_open`）もこの trait が提供し、ドメイン層は
//! トランスポートの内部状態を直接参照しません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// 接続ごとの送信チャンネル（エンコード済みフレームを運ぶ）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 送信時点で接続が開いているか
    ///
    /// `broadcast` は各宛先への送信直前にこれと同じ判定を行う。
    async fn is_open(&self, connection_id: &ConnectionId) -> bool;

    /// イベントを一度だけエンコードし、開いている全ての対象に同じバイト列を送信する。
    ///
    /// 送信直前に `is_open` と同じ判定を宛先ごとに適用し、閉じている・未登録の
    /// 対象はエラーにせずスキップする。送信できた件数を返す。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<usize, MessagePushError>;
}
