//! Reaction entity <-> model mapper

use spark_core::entities::Reaction;
use spark_core::value_objects::Snowflake;

use crate::models::ReactionModel;

impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            from_id: Snowflake::new(model.from_id),
            to_id: Snowflake::new(model.to_id),
            liked: model.liked,
            created_at: model.created_at,
        }
    }
}
