//! Connection registry aggregate.
//!
//! Single source of truth for "who is connected and under what identity".
//! Rate-limit windows live on each [`Connection`], so one exclusive borrow of the
//! registry covers both membership and rate-limit state.

use super::{
    entity::Connection,
    error::RepositoryError,
    rate_limit::{RateLimitDecision, RateLimitPolicy},
    value_object::{ConnectionId, DisplayName, Timestamp},
};

#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    /// Live connections in registration order.
    connections: Vec<Connection>,
    /// Joined connections in attachment order.
    roster: Vec<ConnectionId>,
    chat_policy: RateLimitPolicy,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_policy(chat_policy: RateLimitPolicy) -> Self {
        Self {
            chat_policy,
            ..Self::default()
        }
    }

    pub fn chat_policy(&self) -> RateLimitPolicy {
        self.chat_policy
    }

    /// Track a new, unidentified connection.
    pub fn register(
        &mut self,
        id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        if self.find(&id).is_some() {
            return Err(RepositoryError::AlreadyRegistered(id));
        }
        self.connections.push(Connection::new(id, connected_at));
        Ok(())
    }

    /// Sanitize `raw_name` and attach it as the connection's identity.
    ///
    /// A connection keeps its first identity forever; a second attempt is
    /// rejected with [`RepositoryError::AlreadyJoined`].
    pub fn attach_identity(
        &mut self,
        id: &ConnectionId,
        raw_name: &str,
    ) -> Result<DisplayName, RepositoryError> {
        let connection = self
            .find_mut(id)
            .ok_or(RepositoryError::ConnectionNotFound(*id))?;
        if connection.is_joined() {
            return Err(RepositoryError::AlreadyJoined(*id));
        }

        let name = DisplayName::new(raw_name)?;
        connection.identity = Some(name.clone());
        self.roster.push(*id);
        Ok(name)
    }

    /// Drop the connection and its rate-limit state. Idempotent.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| &c.id == id)?;
        self.roster.retain(|joined| joined != id);
        Some(self.connections.remove(index))
    }

    /// Identities of every joined connection, in attachment order.
    pub fn current_identities(&self) -> Vec<DisplayName> {
        self.roster
            .iter()
            .filter_map(|id| self.find(id))
            .filter_map(|c| c.identity.clone())
            .collect()
    }

    pub fn identity_of(&self, id: &ConnectionId) -> Option<DisplayName> {
        self.find(id).and_then(|c| c.identity.clone())
    }

    /// Every registered connection, joined or not.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.connections.iter().map(|c| c.id).collect()
    }

    /// Check the chat policy for `id` at `now` and record the attempt if allowed.
    pub fn record_chat_attempt(
        &mut self,
        id: &ConnectionId,
        now: Timestamp,
    ) -> Result<RateLimitDecision, RepositoryError> {
        let policy = self.chat_policy;
        let connection = self
            .find_mut(id)
            .ok_or(RepositoryError::ConnectionNotFound(*id))?;
        Ok(connection.rate_limit.check_and_record(&policy, now))
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn joined_count(&self) -> usize {
        self.roster.len()
    }

    fn find(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }

    fn find_mut(&mut self, id: &ConnectionId) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| &c.id == id)
    }
}
