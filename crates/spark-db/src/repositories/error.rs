//! SQLx error translation

use spark_core::error::DomainError;
use sqlx::Error as SqlxError;

pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::StorageError(e.to_string())
}

/// Unique violations become `on_unique()`, everything else a storage error
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Serialization failures and deadlocks surface as conflicts the caller may retry
pub fn map_write_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        // 40001 serialization_failure, 40P01 deadlock_detected
        if matches!(db_err.code().as_deref(), Some("40001" | "40P01")) || db_err.is_unique_violation() {
            return DomainError::Conflict(db_err.message().to_string());
        }
    }
    map_db_error(e)
}
