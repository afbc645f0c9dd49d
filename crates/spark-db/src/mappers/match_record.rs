//! Match entity <-> model mapper

use spark_core::entities::Match;
use spark_core::value_objects::{PairKey, Snowflake};

use crate::models::MatchModel;

impl From<MatchModel> for Match {
    fn from(model: MatchModel) -> Self {
        Match {
            id: Snowflake::new(model.id),
            pair: PairKey::new(Snowflake::new(model.user_low), Snowflake::new(model.user_high)),
            created_at: model.created_at,
        }
    }
}
