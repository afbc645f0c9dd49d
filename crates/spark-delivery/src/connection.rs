//! One live delivery channel

use spark_core::{Message, Snowflake};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Lifecycle of a registered stream; an unregistered user is disconnected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Backlog is being replayed; live pushes queue up behind it
    Replaying,
    Live,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        if value == 1 {
            Self::Live
        } else {
            Self::Replaying
        }
    }
}

/// Result of a non-blocking push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// Buffer full; the message is dropped and recoverable through replay
    Full,
    /// The stream has gone away
    Closed,
}

/// Sending half of a user's stream
///
/// Dropping the last `Arc<Connection>` drops the sender, which ends the stream
/// once its buffer drains.
pub struct Connection {
    id: u64,
    user_id: Snowflake,
    sender: mpsc::Sender<Message>,
    state: AtomicU8,
    dropped: AtomicU64,
    created_at: Instant,
}

impl Connection {
    pub(crate) fn new(id: u64, user_id: Snowflake, sender: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            user_id,
            sender,
            state: AtomicU8::new(0),
            dropped: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    /// Registry-unique id distinguishing successive connections of one user
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn user_id(&self) -> Snowflake {
        self.user_id
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn go_live(&self) {
        self.state.store(1, Ordering::Release);
    }

    /// Pushes dropped because the buffer was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Enqueue without waiting
    pub fn push(&self, message: Message) -> PushOutcome {
        match self.sender.try_send(message) {
            Ok(()) => PushOutcome::Queued,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                PushOutcome::Full
            }
            Err(TrySendError::Closed(_)) => PushOutcome::Closed,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("state", &self.state())
            .field("dropped", &self.dropped())
            .finish()
    }
}
