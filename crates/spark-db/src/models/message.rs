//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub match_id: i64,
    pub from_id: i64,
    pub to_id: i64,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}
