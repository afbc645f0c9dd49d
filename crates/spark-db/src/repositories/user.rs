//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use spark_core::entities::User;
use spark_core::error::DomainError;
use spark_core::traits::{CandidateQuery, RepoResult, UserRepository};
use spark_core::value_objects::{Snowflake, EARTH_RADIUS_KM};

use crate::mappers::UserInsert;
use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};

const USER_COLUMNS: &str = "id, email, name, birthday, sex, latitude, longitude, description, \
                            avatar, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_users(models: Vec<UserModel>) -> RepoResult<Vec<User>> {
    models.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let insert = UserInsert::new(user, password_hash);

        sqlx::query(
            r"
            INSERT INTO users (id, email, password_hash, name, birthday, sex, latitude, longitude,
                               description, avatar, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(insert.id)
        .bind(insert.email)
        .bind(insert.password_hash)
        .bind(insert.name)
        .bind(user.birthday)
        .bind(insert.sex)
        .bind(insert.latitude)
        .bind(insert.longitude)
        .bind(insert.description)
        .bind(insert.avatar)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET name = $2, birthday = $3, sex = $4, latitude = $5, longitude = $6,
                description = $7, avatar = $8, updated_at = $9
            WHERE id = $1
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.name)
        .bind(user.birthday)
        .bind(user.sex.as_str())
        .bind(user.location.latitude)
        .bind(user.location.longitude)
        .bind(&user.description)
        .bind(user.avatar.as_deref())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(user.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_candidates(&self, query: &CandidateQuery) -> RepoResult<Vec<User>> {
        // Haversine in SQL; LEAST guards asin against rounding just above 1
        let sql = format!(
            r"
            WITH scored AS (
                SELECT {USER_COLUMNS},
                       2 * $9 * ASIN(LEAST(1.0, SQRT(
                           POWER(SIN(RADIANS(latitude - $5) / 2), 2)
                           + COS(RADIANS($5)) * COS(RADIANS(latitude))
                             * POWER(SIN(RADIANS(longitude - $6) / 2), 2)
                       ))) AS distance_km,
                       DATE_PART('year', AGE(CURRENT_DATE, birthday))::INT AS age
                FROM users u
                WHERE u.id <> $1
                  AND ($2::TEXT IS NULL OR u.sex = $2)
                  AND NOT EXISTS (
                      SELECT 1 FROM reactions r WHERE r.from_id = $1 AND r.to_id = u.id
                  )
            )
            SELECT {USER_COLUMNS}
            FROM scored
            WHERE ($3::INT IS NULL OR age >= $3)
              AND ($4::INT IS NULL OR age <= $4)
              AND ($7::FLOAT8 IS NULL OR distance_km <= $7)
            ORDER BY distance_km, id
            LIMIT $8
            "
        );

        let results = sqlx::query_as::<_, UserModel>(&sql)
            .bind(query.requester.into_inner())
            .bind(query.sex.map(|s| s.as_str()))
            .bind(query.min_age.map(|a| a as i32))
            .bind(query.max_age.map(|a| a as i32))
            .bind(query.origin.latitude)
            .bind(query.origin.longitude)
            .bind(query.max_distance_km)
            .bind(query.limit)
            .bind(EARTH_RADIUS_KM)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_users(results)
    }
}
