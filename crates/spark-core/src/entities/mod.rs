//! Domain entities - core business objects

mod match_record;
mod message;
mod reaction;
mod user;

pub use match_record::Match;
pub use message::{Message, MAX_MESSAGE_LENGTH};
pub use reaction::{MatchDecision, Reaction};
pub use user::{Sex, User, UserPatch};
