//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use spark_core::entities::{Match, Message, Reaction, User};
use spark_core::Snowflake;

use super::responses::{
    CandidateResponse, CurrentUserResponse, MatchResponse, MessageResponse, ReactionResponse,
    UserResponse,
};

/// Public path prefix for uploaded files
pub const STATIC_PREFIX: &str = "/static";

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            age: user.age(),
            birthday: user.birthday,
            sex: user.sex,
            latitude: user.location.latitude,
            longitude: user.location.longitude,
            description: user.description.clone(),
            avatar: user
                .avatar
                .as_ref()
                .map(|file| format!("{STATIC_PREFIX}/{file}")),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            profile: UserResponse::from(user),
            email: user.email.clone(),
        }
    }
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl CandidateResponse {
    /// Profile of `candidate` as seen by `requester`
    pub fn new(requester: &User, candidate: &User) -> Self {
        Self {
            profile: UserResponse::from(candidate),
            distance_km: requester.distance_km(candidate),
        }
    }
}

// ============================================================================
// Match Mappers
// ============================================================================

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            from_id: reaction.from_id.to_string(),
            to_id: reaction.to_id.to_string(),
            liked: reaction.liked,
            created_at: reaction.created_at,
        }
    }
}

impl MatchResponse {
    /// `viewer` is expected to be one of the two matched users
    pub fn for_viewer(record: &Match, viewer: Snowflake) -> Self {
        let partner = record.partner_of(viewer).unwrap_or(viewer);
        Self {
            id: record.id.to_string(),
            partner_id: partner.to_string(),
            created_at: record.created_at,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            match_id: message.match_id.to_string(),
            from_id: message.from_id.to_string(),
            to_id: message.to_id.to_string(),
            text: message.text.clone(),
            sent_at: message.sent_at,
            match_notification: message.is_match_notification(),
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}
