//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - レジストリからの削除、送信チャンネルの登録解除、退出時のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：join 済み接続の切断（残りの接続にロスターと退出通知）
//! - 正常系：未 join 接続の切断（ブロードキャストなし）
//! - 冪等性：同じ接続の二重切断

use std::sync::Arc;

use chatter_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRepository, DisplayName, MessagePusher, ServerEvent, SystemNotice,
    Timestamp,
};

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// 退出通知（system メッセージ）を送るか
    announce: bool,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            announce: true,
        }
    }

    pub fn with_announcements(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    /// 切断を実行（冪等）
    ///
    /// # Returns
    ///
    /// 切断された接続が join 済みだった場合、その identity
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<DisplayName> {
        self.message_pusher.unregister_client(&connection_id).await;

        let removed = self.repository.remove(&connection_id).await?;
        let now = Timestamp::new(self.clock.now_millis());
        tracing::debug!(
            "Connection '{}' removed after {} ms",
            connection_id,
            removed.session_millis(now)
        );
        let name = removed.identity?;

        let roster = self.repository.current_identities().await;
        let targets = self.repository.connection_ids().await;

        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &ServerEvent::Roster(roster))
            .await
        {
            tracing::warn!("Failed to broadcast roster after '{}' left: {}", name, e);
        }

        if self.announce {
            let notice = SystemNotice::left(&name, now);
            if let Err(e) = self
                .message_pusher
                .broadcast(targets, &ServerEvent::Notice(notice))
                .await
            {
                tracing::warn!("Failed to broadcast leave notice for '{}': {}", name, e);
            }
        }

        Some(name)
    }
}
