//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub from_id: i64,
    pub to_id: i64,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}
