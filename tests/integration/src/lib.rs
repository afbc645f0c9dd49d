//! Integration test utilities for the spark server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API and the message event stream.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
