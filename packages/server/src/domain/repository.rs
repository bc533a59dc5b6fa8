//! Repository trait 定義
//!
//! ドメイン層が必要とする接続レジストリへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    Connection, ConnectionId, DisplayName, RateLimitDecision, RepositoryError, Timestamp,
};

/// Connection Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
/// 実装は接続集合とレート制限状態を単一の排他制御の下で扱うこと。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 未 join の接続を登録
    async fn register(
        &self,
        connection_id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// 生の名前をサニタイズ・検証して identity として設定
    async fn attach_identity(
        &self,
        connection_id: &ConnectionId,
        raw_name: &str,
    ) -> Result<DisplayName, RepositoryError>;

    /// 接続を削除（冪等）。削除された接続を返す
    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// join 済みの identity 一覧（join 順）
    async fn current_identities(&self) -> Vec<DisplayName>;

    /// 接続の identity を取得
    async fn identity_of(&self, connection_id: &ConnectionId) -> Option<DisplayName>;

    /// 登録中の全ての接続 ID を取得（ブロードキャスト対象）
    async fn connection_ids(&self) -> Vec<ConnectionId>;

    /// チャットのレート制限を判定し、許可された場合は記録
    async fn record_chat_attempt(
        &self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Result<RateLimitDecision, RepositoryError>;

    /// 登録中の接続数を取得
    async fn count_connections(&self) -> usize;
}
