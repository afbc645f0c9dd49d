//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs; `spark-db` provides the Postgres and
//! in-memory implementations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{Match, Message, Reaction, Sex, User};
use crate::error::DomainError;
use crate::value_objects::{GeoPoint, PairKey, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

/// Filter for recommendation candidates
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    /// User asking for recommendations; excluded along with everyone they reacted to
    pub requester: Snowflake,
    pub origin: GeoPoint,
    pub sex: Option<Sex>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub max_distance_km: Option<f64>,
    pub limit: i64,
}

impl CandidateQuery {
    /// Profile-level filters; reaction exclusion is left to the store
    pub fn accepts(&self, user: &User, today: NaiveDate) -> bool {
        if user.id == self.requester {
            return false;
        }
        if self.sex.is_some_and(|sex| sex != user.sex) {
            return false;
        }
        let age = user.age_on(today);
        if self.min_age.is_some_and(|min| age < min) || self.max_age.is_some_and(|max| age > max) {
            return false;
        }
        self.max_distance_km
            .is_none_or(|max| self.origin.distance_km(&user.location) <= max)
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Create a new user. Fails with `EmailAlreadyExists` on a taken email.
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Persist profile fields and avatar
    async fn update(&self, user: &User) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Candidates ordered by distance from `query.origin`, nearest first
    async fn find_candidates(&self, query: &CandidateQuery) -> RepoResult<Vec<User>>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Insert or overwrite the reaction for `(from_id, to_id)`
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()>;

    /// Insert only when no reaction exists for the ordered pair. Returns whether it was written.
    async fn insert_if_absent(&self, reaction: &Reaction) -> RepoResult<bool>;

    /// Indexed lookup of a single directed reaction
    async fn find(&self, from_id: Snowflake, to_id: Snowflake) -> RepoResult<Option<Reaction>>;

    /// Every reaction authored by `user_id`
    async fn find_outgoing(&self, user_id: Snowflake) -> RepoResult<Vec<Reaction>>;
}

// ============================================================================
// Match Repository
// ============================================================================

#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Insert unless the pair already has a match. Returns whether it was created.
    async fn create_if_absent(&self, record: &Match) -> RepoResult<bool>;

    async fn find_by_pair(&self, pair: PairKey) -> RepoResult<Option<Match>>;

    /// Matches involving `user_id`, newest first
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Match>>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Exclusive position in a user's message timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageCursor {
    pub sent_at: DateTime<Utc>,
    pub id: Snowflake,
}

impl MessageCursor {
    /// Cursor selecting every message strictly newer than `since`
    pub fn since(since: DateTime<Utc>) -> Self {
        Self {
            sent_at: since,
            id: Snowflake::MAX,
        }
    }

    pub fn of(message: &Message) -> Self {
        Self {
            sent_at: message.sent_at,
            id: message.id,
        }
    }

    /// Whether `message` lies strictly after this cursor
    pub fn precedes(&self, message: &Message) -> bool {
        *self < Self::of(message)
    }
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Messages sent or received by `user_id` after `cursor`, ascending by `(sent_at, id)`
    async fn find_after(
        &self,
        user_id: Snowflake,
        cursor: MessageCursor,
        limit: i64,
    ) -> RepoResult<Vec<Message>>;

    /// The empty-text message announcing `match_id`, if it was ever stored
    async fn find_match_notification(&self, match_id: Snowflake) -> RepoResult<Option<Message>>;
}

// ============================================================================
// Health
// ============================================================================

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Cheap round-trip to the backing store
    async fn ping(&self) -> RepoResult<()>;
}
