//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - イベントのエンコードと全接続へのファンアウト（broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 受信側（ソケットへの書き込みタスク）が終了するとチャンネルが閉じ、
//! その接続は `is_open` が false になります。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent},
    infrastructure::dto::conversion::encode_server_event,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.register_client(connection_id, tx).await;
/// pusher.broadcast(vec![connection_id], &event).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

/// `is_open` と `broadcast` が共有する送信可否の判定。開いている場合のみ送信口を返す
fn open_channel<'a>(
    clients: &'a HashMap<ConnectionId, PusherChannel>,
    connection_id: &ConnectionId,
) -> Option<&'a PusherChannel> {
    clients
        .get(connection_id)
        .filter(|sender| !sender.is_closed())
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn is_open(&self, connection_id: &ConnectionId) -> bool {
        let clients = self.clients.lock().await;
        open_channel(&clients, connection_id).is_some()
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<usize, MessagePushError> {
        // 全ての宛先に同一のバイト列を送るため、エンコードは 1 回だけ
        let payload = encode_server_event(event)
            .map_err(|e| MessagePushError::Serialization(e.to_string()))?;

        let clients = self.clients.lock().await;
        let mut delivered = 0;

        for target in targets {
            let Some(sender) = open_channel(&clients, &target) else {
                tracing::debug!(
                    "Connection '{}' is closed or unknown, skipping",
                    target
                );
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容
            match sender.send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Failed to push {} event to connection '{}': {}",
                    event.kind(),
                    target,
                    e
                ),
            }
        }

        tracing::debug!("Broadcasted {} event to {} connection(s)", event.kind(), delivered);
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatEvent, DisplayName, MessageText, Timestamp};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - broadcast: 開いている全ての接続への送信、閉じた接続のスキップ
    // - is_open: 送信可否の判定
    //
    // 【どのようなシナリオをテストするか】
    // 1. 複数接続へのブロードキャスト（同一バイト列）
    // 2. 閉じた接続・未登録の接続を含むブロードキャスト（部分成功）
    // 3. 登録解除後の is_open
    // ========================================

    fn create_test_pusher() -> WebSocketMessagePusher {
        WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())))
    }

    fn chat_event() -> ServerEvent {
        ServerEvent::Chat(ChatEvent::new(
            DisplayName::new("alice").unwrap(),
            MessageText::new("hello").unwrap(),
            Timestamp::new(0),
        ))
    }

    #[tokio::test]
    async fn test_broadcast_delivers_identical_bytes() {
        // テスト項目: 全ての接続に同一のペイロードが届く
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        pusher.register_client(a, tx1).await;
        pusher.register_client(b, tx2).await;

        // when (操作):
        let delivered = pusher.broadcast(vec![a, b], &chat_event()).await.unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 2);
        let first = rx1.recv().await.unwrap();
        let second = rx2.recv().await.unwrap();
        assert_eq!(first, second);
        assert!(first.contains(r#""type":"chat""#));
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_and_unknown_connections() {
        // テスト項目: 閉じた接続・未登録の接続はエラーにならずスキップされる
        // given (前提条件):
        let pusher = create_test_pusher();
        let (open_tx, mut open_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();
        let open = ConnectionId::generate();
        let closed = ConnectionId::generate();
        pusher.register_client(open, open_tx).await;
        pusher.register_client(closed, closed_tx).await;
        drop(closed_rx);

        // when (操作):
        let targets = vec![open, closed, ConnectionId::generate()];
        let result = pusher.broadcast(targets, &chat_event()).await;

        // then (期待する結果): is_open の判定どおりに送信先が選ばれる
        assert_eq!(result, Ok(1));
        assert!(open_rx.recv().await.is_some());
        assert!(pusher.is_open(&open).await);
        assert!(!pusher.is_open(&closed).await);
    }

    #[tokio::test]
    async fn test_is_open_after_unregister() {
        // テスト項目: 登録解除した接続は開いていないと判定される
        // given (前提条件):
        let pusher = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        pusher.register_client(id, tx).await;
        assert!(pusher.is_open(&id).await);

        // when (操作):
        pusher.unregister_client(&id).await;

        // then (期待する結果):
        assert!(!pusher.is_open(&id).await);
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = create_test_pusher();

        // when (操作):
        let result = pusher.broadcast(vec![], &ServerEvent::Roster(vec![])).await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }
}
