//! Delivery router
//!
//! `deliver` persists first and then pushes without blocking; `connect` registers
//! a channel before reading the backlog, so anything delivered while the backlog
//! is being replayed waits in the channel instead of being lost.

use async_stream::stream;
use chrono::{DateTime, Utc};
use futures_util::Stream;
use spark_core::{Message, MessageCursor, MessageRepository, RepoResult, Snowflake};
use std::collections::HashSet;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, instrument, warn};

use crate::connection::{Connection, PushOutcome};
use crate::registry::ConnectionRegistry;

/// Replay followed by live messages; ends when the connection is replaced or
/// removed. Dropping it deregisters the connection.
pub type MessageStream = Pin<Box<dyn Stream<Item = Message> + Send>>;

#[derive(Debug, Clone, Copy)]
pub struct RouterSettings {
    pub channel_buffer: usize,
    pub replay_page_size: i64,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            channel_buffer: 100,
            replay_page_size: 100,
        }
    }
}

/// Per-delivery push counts across both participants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub pushed: usize,
    pub dropped: usize,
    pub offline: usize,
}

pub struct DeliveryRouter {
    registry: Arc<ConnectionRegistry>,
    messages: Arc<dyn MessageRepository>,
    settings: RouterSettings,
    dropped_total: AtomicU64,
}

impl DeliveryRouter {
    pub fn new(
        registry: ConnectionRegistry,
        messages: Arc<dyn MessageRepository>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            messages,
            settings,
            dropped_total: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn online_count(&self) -> usize {
        self.registry.len()
    }

    /// Live pushes dropped on full buffers since startup
    pub fn dropped_total(&self) -> u64 {
        self.dropped_total.load(Ordering::Relaxed)
    }

    /// Open the stream for `user_id`, replaying messages newer than `since`
    ///
    /// The first backlog page is read before returning so storage failures surface
    /// here; later pages are read lazily as the stream is polled.
    #[instrument(skip(self))]
    pub async fn connect(
        &self,
        user_id: Snowflake,
        since: DateTime<Utc>,
    ) -> RepoResult<MessageStream> {
        let page_size = self.settings.replay_page_size.max(1);
        let (connection, mut receiver) = self.registry.register(user_id, self.settings.channel_buffer);
        let guard = StreamGuard::new(Arc::clone(&self.registry), &connection);
        drop(connection);

        let mut filter = ReplayFilter::new(MessageCursor::since(since));
        let first_page = self.messages.find_after(user_id, filter.cursor(), page_size).await?;
        info!(user_id = %user_id, connection = guard.connection_id, "Stream opened");

        let messages = Arc::clone(&self.messages);
        let stream = stream! {
            let guard = guard;
            let mut page = first_page;

            loop {
                let more = page.len() as i64 >= page_size;
                for message in page {
                    filter.record(&message);
                    yield message;
                }
                if !more || guard.is_orphaned() {
                    break;
                }
                page = match messages.find_after(user_id, filter.cursor(), page_size).await {
                    Ok(next) => next,
                    Err(e) => {
                        warn!(user_id = %user_id, error = %e, "Backlog read failed, closing stream");
                        return;
                    }
                };
            }

            guard.go_live();
            debug!(user_id = %user_id, replayed = filter.pending(), "Replay finished");

            while let Some(message) = receiver.recv().await {
                if filter.admits(&message) {
                    yield message;
                }
            }
        };

        Ok(Box::pin(stream))
    }

    /// Persist `message`, then push it to each participant with an open stream
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    pub async fn deliver(&self, message: &Message) -> RepoResult<DeliveryReport> {
        self.messages.create(message).await?;
        Ok(self.push(message))
    }

    fn push(&self, message: &Message) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let [from, to] = message.participants();
        let recipients = [Some(from), (to != from).then_some(to)];

        for user_id in recipients.into_iter().flatten() {
            let Some(connection) = self.registry.get(user_id) else {
                report.offline += 1;
                continue;
            };

            match connection.push(message.clone()) {
                PushOutcome::Queued => report.pushed += 1,
                PushOutcome::Full => {
                    report.dropped += 1;
                    self.dropped_total.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        user_id = %user_id,
                        message_id = %message.id,
                        dropped = connection.dropped(),
                        "Delivery buffer full, live push dropped"
                    );
                }
                PushOutcome::Closed => {
                    report.offline += 1;
                    self.registry.remove_if_current(user_id, connection.id());
                }
            }
        }

        debug!(
            pushed = report.pushed,
            dropped = report.dropped,
            offline = report.offline,
            "Message routed"
        );
        report
    }

    /// Drop the user's stream, if any. Safe to call repeatedly.
    pub fn disconnect(&self, user_id: Snowflake) -> bool {
        let removed = self.registry.remove(user_id).is_some();
        if removed {
            debug!(user_id = %user_id, "Disconnected");
        }
        removed
    }
}

/// Replayed ids that may still be queued as live pushes
///
/// A message persisted before the backlog read can have its push land in the
/// channel too. Those pushes all sit at or below the last replayed position, so
/// the set is dropped once a live message past that position shows up.
#[derive(Debug)]
struct ReplayFilter {
    cursor: MessageCursor,
    replayed: HashSet<Snowflake>,
}

impl ReplayFilter {
    fn new(since: MessageCursor) -> Self {
        Self {
            cursor: since,
            replayed: HashSet::new(),
        }
    }

    /// Position to resume the backlog from
    fn cursor(&self) -> MessageCursor {
        self.cursor
    }

    fn record(&mut self, message: &Message) {
        self.cursor = MessageCursor::of(message);
        self.replayed.insert(message.id);
    }

    fn pending(&self) -> usize {
        self.replayed.len()
    }

    /// Whether a live message should be yielded
    fn admits(&mut self, message: &Message) -> bool {
        if self.replayed.is_empty() {
            return true;
        }
        if self.cursor.precedes(message) {
            self.replayed = HashSet::new();
            return true;
        }
        !self.replayed.remove(&message.id)
    }
}

/// Owned by the stream; deregisters its own connection when the stream is dropped
struct StreamGuard {
    registry: Arc<ConnectionRegistry>,
    connection: Weak<Connection>,
    user_id: Snowflake,
    connection_id: u64,
}

impl StreamGuard {
    fn new(registry: Arc<ConnectionRegistry>, connection: &Arc<Connection>) -> Self {
        Self {
            registry,
            connection: Arc::downgrade(connection),
            user_id: connection.user_id(),
            connection_id: connection.id(),
        }
    }

    /// Replaced or disconnected while still replaying
    fn is_orphaned(&self) -> bool {
        self.connection.strong_count() == 0
    }

    fn go_live(&self) {
        if let Some(connection) = self.connection.upgrade() {
            connection.go_live();
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.registry.remove_if_current(self.user_id, self.connection_id);
        info!(user_id = %self.user_id, connection = self.connection_id, "Stream closed");
    }
}
