//! # spark-core
//!
//! Domain layer of the matching backend: entities, value objects, repository
//! ports and the reaction decision table. No infrastructure dependencies.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Match, MatchDecision, Message, Reaction, Sex, User, UserPatch, MAX_MESSAGE_LENGTH,
};
pub use error::DomainError;
pub use traits::{
    CandidateQuery, HealthProbe, MatchRepository, MessageCursor, MessageRepository,
    ReactionRepository, RepoResult, UserRepository,
};
pub use value_objects::{
    GeoPoint, MatchOutcome, PairKey, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
