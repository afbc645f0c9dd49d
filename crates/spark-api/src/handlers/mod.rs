//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod messages;
pub mod reactions;
pub mod stream;
pub mod users;
