//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者の検証、レート制限、サニタイズ、全接続へのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：join 済み接続からの送信（送信者自身にもエコーされる）
//! - 異常系：未 join の接続、空メッセージ、レート制限超過
//! - 境界値：ウィンドウ経過後に送信が再び許可される

use std::sync::Arc;

use chatter_shared::time::Clock;

use crate::domain::{
    ChatEvent, ConnectionId, ConnectionRepository, MessagePusher, MessageText, RateLimitDecision,
    ServerEvent, Timestamp,
};

use super::error::SendMessageError;

/// チャット送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// チャット送信を実行
    ///
    /// 送信者名はクライアントの申告ではなく接続の identity を使う。
    /// レート制限はサニタイズより先に判定する（空メッセージも枠を消費する）。
    ///
    /// # Returns
    ///
    /// ブロードキャストした ChatEvent
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        raw_text: &str,
    ) -> Result<ChatEvent, SendMessageError> {
        let from = self
            .repository
            .identity_of(connection_id)
            .await
            .ok_or(SendMessageError::NotJoined(*connection_id))?;

        let now = Timestamp::new(self.clock.now_millis());
        let decision = self
            .repository
            .record_chat_attempt(connection_id, now)
            .await
            .map_err(|_| SendMessageError::NotJoined(*connection_id))?;
        if let RateLimitDecision::Limited { retry_after_millis } = decision {
            return Err(SendMessageError::RateLimited { retry_after_millis });
        }

        let text = MessageText::new(raw_text).map_err(|_| SendMessageError::EmptyMessage)?;
        let event = ChatEvent::new(from, text, now);

        let targets = self.repository.connection_ids().await;
        let delivered = self
            .message_pusher
            .broadcast(targets, &ServerEvent::Chat(event.clone()))
            .await
            .map_err(|e| SendMessageError::BroadcastFailed(e.to_string()))?;
        tracing::debug!(
            "Chat from '{}' delivered to {} connection(s)",
            event.from,
            delivered
        );

        Ok(event)
    }
}
