//! # spark-db
//!
//! Persistence layer implementing the `spark-core` repository traits.
//!
//! - `Pg*Repository`: PostgreSQL via SQLx, one struct per aggregate
//! - [`MemoryStore`]: a single in-process store implementing every trait, used by
//!   tests and by `memory://` deployments
//!
//! ```rust,ignore
//! use spark_db::{create_pool, apply_schema, PgReactionRepository};
//!
//! let pool = create_pool(&config.database).await?;
//! apply_schema(&pool).await?;
//! let reactions = PgReactionRepository::new(pool.clone());
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

pub use memory::MemoryStore;
pub use pool::{create_pool, PgHealthProbe, PgPool};
pub use repositories::{
    PgMatchRepository, PgMessageRepository, PgReactionRepository, PgUserRepository,
};
pub use schema::apply_schema;
