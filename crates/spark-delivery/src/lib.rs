//! # spark-delivery
//!
//! Fans persisted messages out to whichever participants are streaming, and
//! replays history to users as they connect.
//!
//! A [`DeliveryRouter`] owns its [`ConnectionRegistry`]; nothing is process-global,
//! so independent routers can coexist (one per test, for instance).

mod connection;
mod registry;
mod router;

pub use connection::{Connection, ConnectionState, PushOutcome};
pub use registry::ConnectionRegistry;
pub use router::{DeliveryReport, DeliveryRouter, MessageStream, RouterSettings};
