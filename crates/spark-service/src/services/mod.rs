//! Business logic services
//!
//! Each service borrows a [`ServiceContext`] for the duration of one call.

pub mod context;
pub mod error;
pub mod matching;
pub mod message;
pub mod pair_lock;
pub mod recommendation;
pub mod user;

pub use context::{MediaSettings, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use matching::MatchService;
pub use message::MessageService;
pub use pair_lock::{PairGuard, PairLocks};
pub use recommendation::RecommendationService;
pub use user::UserService;
