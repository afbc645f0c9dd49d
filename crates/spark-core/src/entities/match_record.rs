//! Match entity - created once per pair the first time both sides like each other

use chrono::{DateTime, Utc};

use crate::value_objects::{PairKey, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: Snowflake,
    pub pair: PairKey,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn new(id: Snowflake, a: Snowflake, b: Snowflake) -> Self {
        Self {
            id,
            pair: PairKey::new(a, b),
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn involves(&self, user: Snowflake) -> bool {
        self.pair.contains(user)
    }

    /// The matched partner of `user`
    pub fn partner_of(&self, user: Snowflake) -> Option<Snowflake> {
        self.pair.other(user)
    }
}
