//! PostgreSQL implementation of MatchRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use spark_core::entities::Match;
use spark_core::traits::{MatchRepository, RepoResult};
use spark_core::value_objects::{PairKey, Snowflake};

use crate::models::MatchModel;

use super::error::{map_db_error, map_write_error};

#[derive(Clone)]
pub struct PgMatchRepository {
    pool: PgPool,
}

impl PgMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepository for PgMatchRepository {
    #[instrument(skip(self, record), fields(match_id = %record.id))]
    async fn create_if_absent(&self, record: &Match) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO matches (id, user_low, user_high, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_low, user_high) DO NOTHING
            ",
        )
        .bind(record.id.into_inner())
        .bind(record.pair.low().into_inner())
        .bind(record.pair.high().into_inner())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn find_by_pair(&self, pair: PairKey) -> RepoResult<Option<Match>> {
        let result = sqlx::query_as::<_, MatchModel>(
            r"
            SELECT id, user_low, user_high, created_at
            FROM matches
            WHERE user_low = $1 AND user_high = $2
            ",
        )
        .bind(pair.low().into_inner())
        .bind(pair.high().into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Match::from))
    }

    #[instrument(skip(self))]
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Match>> {
        let results = sqlx::query_as::<_, MatchModel>(
            r"
            SELECT id, user_low, user_high, created_at
            FROM matches
            WHERE user_low = $1 OR user_high = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Match::from).collect())
    }
}
