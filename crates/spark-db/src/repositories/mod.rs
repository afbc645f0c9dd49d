//! PostgreSQL repository implementations

mod error;
mod match_record;
mod message;
mod reaction;
mod user;

pub use error::{map_db_error, map_unique_violation};
pub use match_record::PgMatchRepository;
pub use message::PgMessageRepository;
pub use reaction::PgReactionRepository;
pub use user::PgUserRepository;
