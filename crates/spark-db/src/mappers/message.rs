//! Message entity <-> model mapper

use spark_core::entities::Message;
use spark_core::value_objects::Snowflake;

use crate::models::MessageModel;

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            match_id: Snowflake::new(model.match_id),
            from_id: Snowflake::new(model.from_id),
            to_id: Snowflake::new(model.to_id),
            text: model.text,
            sent_at: model.sent_at,
        }
    }
}
