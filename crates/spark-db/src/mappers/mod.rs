//! Entity <-> model conversions

mod match_record;
mod message;
mod reaction;
mod user;

pub use user::UserInsert;
