//! Row models with SQLx `FromRow` derives

mod match_record;
mod message;
mod reaction;
mod user;

pub use match_record::MatchModel;
pub use message::MessageModel;
pub use reaction::ReactionModel;
pub use user::UserModel;
