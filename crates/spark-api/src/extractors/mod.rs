//! Axum extractors for request handling
//!
//! Custom extractors for validation, path ids and time cursors.

mod cursor;
mod path;
mod validated;

pub use cursor::{HistoryParams, TimeCursor, TimeCursorParams};
pub use path::UserIdPath;
pub use validated::{ValidatedJson, ValidatedQuery};
