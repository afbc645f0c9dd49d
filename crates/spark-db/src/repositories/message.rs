//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use spark_core::entities::Message;
use spark_core::traits::{MessageCursor, MessageRepository, RepoResult};
use spark_core::value_objects::Snowflake;

use crate::models::MessageModel;

use super::error::{map_db_error, map_write_error};

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO messages (id, match_id, from_id, to_id, text, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.match_id.into_inner())
        .bind(message.from_id.into_inner())
        .bind(message.to_id.into_inner())
        .bind(&message.text)
        .bind(message.sent_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    // Row-value comparison keeps ties on sent_at stable across pages
    #[instrument(skip(self))]
    async fn find_after(
        &self,
        user_id: Snowflake,
        cursor: MessageCursor,
        limit: i64,
    ) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, match_id, from_id, to_id, text, sent_at
            FROM messages
            WHERE (from_id = $1 OR to_id = $1)
              AND (sent_at, id) > ($2, $3)
            ORDER BY sent_at, id
            LIMIT $4
            ",
        )
        .bind(user_id.into_inner())
        .bind(cursor.sent_at)
        .bind(cursor.id.into_inner())
        .bind(limit.max(1))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_match_notification(&self, match_id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, match_id, from_id, to_id, text, sent_at
            FROM messages
            WHERE match_id = $1 AND text = ''
            ORDER BY sent_at, id
            LIMIT 1
            ",
        )
        .bind(match_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }
}
