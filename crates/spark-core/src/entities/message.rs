//! Message entity - a chat line between two matched users

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Maximum text length in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Message entity
///
/// Ordered by `(sent_at, id)`. Empty `text` marks the notification emitted when
/// the match is formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub match_id: Snowflake,
    pub from_id: Snowflake,
    pub to_id: Snowflake,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: Snowflake,
        match_id: Snowflake,
        from_id: Snowflake,
        to_id: Snowflake,
        text: String,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            match_id,
            from_id,
            to_id,
            text,
            sent_at,
        }
    }

    /// Empty-text message announcing a new match
    pub fn match_notification(
        id: Snowflake,
        match_id: Snowflake,
        from_id: Snowflake,
        to_id: Snowflake,
    ) -> Self {
        Self::new(id, match_id, from_id, to_id, String::new(), Utc::now())
    }

    #[inline]
    pub fn is_match_notification(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn involves(&self, user: Snowflake) -> bool {
        self.from_id == user || self.to_id == user
    }

    /// Both participants, sender first
    pub fn participants(&self) -> [Snowflake; 2] {
        [self.from_id, self.to_id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_is_empty() {
        let m = Message::match_notification(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            Snowflake::new(4),
        );
        assert!(m.is_match_notification());
        assert!(m.involves(Snowflake::new(4)));
        assert!(!m.involves(Snowflake::new(2)));
        assert_eq!(m.participants(), [Snowflake::new(3), Snowflake::new(4)]);
    }
}
