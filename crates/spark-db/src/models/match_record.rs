//! Match database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MatchModel {
    pub id: i64,
    pub user_low: i64,
    pub user_high: i64,
    pub created_at: DateTime<Utc>,
}
