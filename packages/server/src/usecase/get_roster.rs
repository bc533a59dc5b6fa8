//! UseCase: ロスター取得処理（診断用）

use std::sync::Arc;

use crate::domain::{ConnectionRepository, DisplayName};

/// ある時点のロスターと接続数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshot {
    pub users: Vec<DisplayName>,
    pub connections: usize,
}

pub struct GetRosterUseCase {
    repository: Arc<dyn ConnectionRepository>,
}

impl GetRosterUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> RosterSnapshot {
        RosterSnapshot {
            users: self.repository.current_identities().await,
            connections: self.repository.count_connections().await,
        }
    }
}
