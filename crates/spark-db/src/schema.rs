//! Embedded schema script

use sqlx::PgPool;
use tracing::info;

/// Full schema, safe to run repeatedly
pub const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_declares_all_tables() {
        for table in ["users", "reactions", "matches", "messages"] {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "missing table {table}"
            );
        }
        assert!(SCHEMA.contains("UNIQUE (user_low, user_high)"));
    }
}
