//! Message service
//!
//! Handles sending messages between matched users, backlog reads and opening
//! live streams.

use chrono::{DateTime, Utc};
use spark_core::entities::{Message, MAX_MESSAGE_LENGTH};
use spark_core::traits::MessageCursor;
use spark_core::{DomainError, PairKey, Snowflake};
use spark_delivery::MessageStream;
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::user::UserService;

/// Default page size for history reads
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
/// Upper bound for history page size
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist a message and push it to whichever participant is connected
    ///
    /// Requires an existing match between the two users.
    #[instrument(skip(self, text), fields(len = text.chars().count()))]
    pub async fn send(
        &self,
        from_id: Snowflake,
        to_id: Snowflake,
        text: String,
        sent_at: Option<DateTime<Utc>>,
    ) -> ServiceResult<Message> {
        validate_text(&text)?;
        if from_id == to_id {
            return Err(DomainError::NotMatched(from_id, to_id).into());
        }

        let record = self
            .ctx
            .match_repo()
            .find_by_pair(PairKey::new(from_id, to_id))
            .await?
            .ok_or(DomainError::NotMatched(from_id, to_id))?;

        let message = Message::new(
            self.ctx.generate_id(),
            record.id,
            from_id,
            to_id,
            text,
            sent_at.unwrap_or_else(Utc::now),
        );
        let report = self.ctx.router().deliver(&message).await?;

        info!(
            message_id = %message.id,
            match_id = %record.id,
            pushed = report.pushed,
            offline = report.offline,
            "Message sent"
        );
        Ok(message)
    }

    /// Messages involving `user_id` strictly after `since`, oldest first
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        user_id: Snowflake,
        since: Option<DateTime<Utc>>,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<Message>> {
        UserService::new(self.ctx).get(user_id).await?;
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let cursor = MessageCursor::since(since.unwrap_or(DateTime::<Utc>::UNIX_EPOCH));

        Ok(self
            .ctx
            .message_repo()
            .find_after(user_id, cursor, limit)
            .await?)
    }

    /// Open the live stream for `user_id`, replaying everything after `since`
    ///
    /// Replaces any stream the user already has open.
    #[instrument(skip(self))]
    pub async fn open_stream(
        &self,
        user_id: Snowflake,
        since: Option<DateTime<Utc>>,
    ) -> ServiceResult<MessageStream> {
        UserService::new(self.ctx).get(user_id).await?;
        let since = since.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Ok(self.ctx.router().connect(user_id, since).await?)
    }
}

/// Empty text is reserved for match notifications
fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::ValidationError(
            "message text must not be empty".to_string(),
        ));
    }
    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(DomainError::ContentTooLong {
            max: MAX_MESSAGE_LENGTH,
        });
    }
    Ok(())
}
