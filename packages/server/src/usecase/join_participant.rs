//! UseCase: join 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinParticipantUseCase::execute() メソッド
//! - identity の設定、ロスターと参加通知のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効な名前での join（ロスター → 参加通知の順に全接続へ送信）
//! - 異常系：短すぎる名前、二重 join（ブロードキャストなし）
//! - 設定：参加通知を無効化した場合

use std::sync::Arc;

use chatter_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRepository, DisplayName, MessagePusher, ServerEvent, SystemNotice,
    Timestamp,
};

use super::error::JoinError;

/// join のユースケース
pub struct JoinParticipantUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// 参加通知（system メッセージ）を送るか
    announce: bool,
}

impl JoinParticipantUseCase {
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

    /// join を実行
    ///
    /// 成功時はロスターを全接続へブロードキャストし、続けて参加通知を送る。
    /// 拒否時は何も送信しない。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - join する接続
    /// * `raw_name` - クライアントが送ってきた未加工の名前
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        raw_name: &str,
    ) -> Result<DisplayName, JoinError> {
        let name = self
            .repository
            .attach_identity(connection_id, raw_name)
            .await?;

        let roster = self.repository.current_identities().await;
        let targets = self.repository.connection_ids().await;

        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &ServerEvent::Roster(roster))
            .await
        {
            tracing::warn!("Failed to broadcast roster after '{}' joined: {}", name, e);
        }

        if self.announce {
            let notice = SystemNotice::joined(&name, Timestamp::new(self.clock.now_millis()));
            if let Err(e) = self
                .message_pusher
                .broadcast(targets, &ServerEvent::Notice(notice))
                .await
            {
                tracing::warn!("Failed to broadcast join notice for '{}': {}", name, e);
            }
        }

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionRegistry, ValueObjectError, message_pusher::MockMessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRepository,
        },
    };
    use chatter_shared::time::FixedClock;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tokio::sync::{Mutex, mpsc};

    fn create_test_repository() -> Arc<InMemoryConnectionRepository> {
        Arc::new(InMemoryConnectionRepository::new(Arc::new(Mutex::new(
            ConnectionRegistry::new(),
        ))))
    }

    fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
        Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new()))))
    }

    async fn connect(
        repository: &InMemoryConnectionRepository,
        pusher: &WebSocketMessagePusher,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        repository.register(id, Timestamp::new(0)).await.unwrap();
        pusher.register_client(id, tx).await;
        (id, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    #[tokio::test]
    async fn test_join_broadcasts_roster_then_notice_to_everyone() {
        // テスト項目: join 成功時、未 join の接続も含む全員にロスターと参加通知が届く
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_message_pusher();
        let (alice, mut alice_rx) = connect(&repository, &pusher).await;
        let (_lurker, mut lurker_rx) = connect(&repository, &pusher).await;
        let usecase = JoinParticipantUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        );

        // when (操作):
        let result = usecase.execute(&alice, "alice").await;

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "alice");
        for rx in [&mut alice_rx, &mut lurker_rx] {
            let frames = drain(rx);
            assert_eq!(frames.len(), 2);
            assert_eq!(frames[0], json!({"type": "users", "users": ["alice"]}));
            assert_eq!(frames[1]["type"], "system");
            assert_eq!(frames[1]["message"], "alice joined");
        }
    }

    #[tokio::test]
    async fn test_second_join_lists_both_in_join_order() {
        // テスト項目: 2 人目の join 後のロスターには両者が join 順に含まれる
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_message_pusher();
        let (alice, _alice_rx) = connect(&repository, &pusher).await;
        let (bob, mut bob_rx) = connect(&repository, &pusher).await;
        let usecase = JoinParticipantUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        )
        .with_announcements(false);
        usecase.execute(&alice, "alice").await.unwrap();

        // when (操作):
        usecase.execute(&bob, "bob").await.unwrap();

        // then (期待する結果): 通知無効のため users フレームのみ
        let frames = drain(&mut bob_rx);
        assert_eq!(
            frames,
            vec![
                json!({"type": "users", "users": ["alice"]}),
                json!({"type": "users", "users": ["alice", "bob"]}),
            ]
        );
    }

    #[tokio::test]
    async fn test_short_name_is_rejected_without_broadcast() {
        // テスト項目: 1 文字の名前は拒否され、ブロードキャストは行われない
        // given (前提条件):
        let repository = create_test_repository();
        let id = ConnectionId::generate();
        repository.register(id, Timestamp::new(0)).await.unwrap();
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let usecase = JoinParticipantUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            Arc::new(FixedClock::new(0)),
        );

        // when (操作):
        let result = usecase.execute(&id, "a").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(JoinError::InvalidName(ValueObjectError::TooShort {
                min: 2,
                actual: 1
            }))
        );
        assert_eq!(repository.identity_of(&id).await, None);
    }

    #[tokio::test]
    async fn test_rejoin_is_ignored_and_identity_kept() {
        // テスト項目: join 済み接続の再 join は拒否され、identity は変わらない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_message_pusher();
        let (alice, mut alice_rx) = connect(&repository, &pusher).await;
        let usecase = JoinParticipantUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        );
        usecase.execute(&alice, "alice").await.unwrap();
        drain(&mut alice_rx);

        // when (操作):
        let result = usecase.execute(&alice, "mallory").await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::AlreadyJoined(alice)));
        assert_eq!(
            repository.identity_of(&alice).await.map(DisplayName::into_string),
            Some("alice".to_string())
        );
        assert!(drain(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_join_from_unknown_connection() {
        // テスト項目: 未登録の接続からの join は NotConnected になる
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = JoinParticipantUseCase::new(
            repository,
            create_test_message_pusher(),
            Arc::new(FixedClock::new(0)),
        );
        let stranger = ConnectionId::generate();

        // when (操作):
        let result = usecase.execute(&stranger, "alice").await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::NotConnected(stranger)));
    }
}
