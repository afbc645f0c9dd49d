//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use spark_core::entities::Reaction;
use spark_core::traits::{ReactionRepository, RepoResult};
use spark_core::value_objects::Snowflake;

use crate::models::ReactionModel;

use super::error::{map_db_error, map_write_error};

#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self, reaction), fields(from = %reaction.from_id, to = %reaction.to_id))]
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO reactions (from_id, to_id, liked, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (from_id, to_id)
            DO UPDATE SET liked = EXCLUDED.liked, created_at = EXCLUDED.created_at
            ",
        )
        .bind(reaction.from_id.into_inner())
        .bind(reaction.to_id.into_inner())
        .bind(reaction.liked)
        .bind(reaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self, reaction), fields(from = %reaction.from_id, to = %reaction.to_id))]
    async fn insert_if_absent(&self, reaction: &Reaction) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO reactions (from_id, to_id, liked, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (from_id, to_id) DO NOTHING
            ",
        )
        .bind(reaction.from_id.into_inner())
        .bind(reaction.to_id.into_inner())
        .bind(reaction.liked)
        .bind(reaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn find(&self, from_id: Snowflake, to_id: Snowflake) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT from_id, to_id, liked, created_at
            FROM reactions
            WHERE from_id = $1 AND to_id = $2
            ",
        )
        .bind(from_id.into_inner())
        .bind(to_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Reaction::from))
    }

    #[instrument(skip(self))]
    async fn find_outgoing(&self, user_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT from_id, to_id, liked, created_at
            FROM reactions
            WHERE from_id = $1
            ORDER BY created_at, to_id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Reaction::from).collect())
    }
}
