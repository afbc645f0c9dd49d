//! Database connection pool management

mod postgres;

pub use postgres::{create_pool, PgHealthProbe};

pub use sqlx::postgres::PgPool;
