//! Registry of live delivery channels
//!
//! At most one connection per user. Registering again replaces (and thereby
//! orphans) the previous connection.

use dashmap::DashMap;
use spark_core::{Message, Snowflake};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::connection::{Connection, ConnectionState};

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<Snowflake, Arc<Connection>>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a bounded channel for `user_id`, replacing any existing one
    pub fn register(
        &self,
        user_id: Snowflake,
        buffer: usize,
    ) -> (Arc<Connection>, mpsc::Receiver<Message>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let connection = Arc::new(Connection::new(id, user_id, sender));

        if let Some(previous) = self.connections.insert(user_id, Arc::clone(&connection)) {
            debug!(
                user_id = %user_id,
                previous = previous.id(),
                connection = id,
                "Replaced existing connection"
            );
        }

        (connection, receiver)
    }

    pub fn get(&self, user_id: Snowflake) -> Option<Arc<Connection>> {
        self.connections.get(&user_id).map(|c| Arc::clone(c.value()))
    }

    /// Remove whatever connection `user_id` has. Safe to repeat.
    pub fn remove(&self, user_id: Snowflake) -> Option<Arc<Connection>> {
        self.connections.remove(&user_id).map(|(_, c)| c)
    }

    /// Remove only if `connection_id` is still the user's current connection
    pub fn remove_if_current(&self, user_id: Snowflake, connection_id: u64) -> bool {
        self.connections
            .remove_if(&user_id, |_, c| c.id() == connection_id)
            .is_some()
    }

    /// `None` when the user is offline
    pub fn state_of(&self, user_id: Snowflake) -> Option<ConnectionState> {
        self.connections.get(&user_id).map(|c| c.state())
    }

    pub fn is_online(&self, user_id: Snowflake) -> bool {
        self.connections.contains_key(&user_id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
