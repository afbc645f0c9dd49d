//! Ports implemented by the persistence layer

mod repositories;

pub use repositories::{
    CandidateQuery, HealthProbe, MatchRepository, MessageCursor, MessageRepository,
    ReactionRepository, RepoResult, UserRepository,
};
