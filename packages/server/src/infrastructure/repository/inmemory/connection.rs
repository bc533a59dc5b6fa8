//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! `ConnectionRegistry` 集約を 1 つの Mutex で保持し、接続集合とレート制限状態を
//! 同じ排他制御の下で更新します。サーバー起動時に生成され、停止時に破棄されます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, ConnectionRepository, DisplayName,
    RateLimitDecision, RepositoryError, Timestamp,
};

/// インメモリ Connection Repository 実装
pub struct InMemoryConnectionRepository {
    registry: Arc<Mutex<ConnectionRegistry>>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new(registry: Arc<Mutex<ConnectionRegistry>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(
        &self,
        connection_id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.register(connection_id, connected_at)
    }

    async fn attach_identity(
        &self,
        connection_id: &ConnectionId,
        raw_name: &str,
    ) -> Result<DisplayName, RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.attach_identity(connection_id, raw_name)
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut registry = self.registry.lock().await;
        registry.remove(connection_id)
    }

    async fn current_identities(&self) -> Vec<DisplayName> {
        let registry = self.registry.lock().await;
        registry.current_identities()
    }

    async fn identity_of(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        let registry = self.registry.lock().await;
        registry.identity_of(connection_id)
    }

    async fn connection_ids(&self) -> Vec<ConnectionId> {
        let registry = self.registry.lock().await;
        registry.connection_ids()
    }

    async fn record_chat_attempt(
        &self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Result<RateLimitDecision, RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry.record_chat_attempt(connection_id, now)
    }

    async fn count_connections(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.len()
    }
}
