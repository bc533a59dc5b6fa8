//! UseCase: 接続処理
//!
//! トランスポートの接続受付時に、未 join の接続としてレジストリに登録し、
//! 送信チャンネルを MessagePusher に登録します。

use std::sync::Arc;

use chatter_shared::time::Clock;

use crate::domain::{ConnectionId, ConnectionRepository, MessagePusher, PusherChannel, Timestamp};

use super::error::ConnectError;

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
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

    /// 接続を登録
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続時刻
    /// * `Err(ConnectError)` - 同じハンドルが既に登録されている
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_millis());

        self.repository
            .register(connection_id, connected_at)
            .await
            .map_err(|_| ConnectError::AlreadyRegistered(connection_id))?;

        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        Ok(connected_at)
    }
}
