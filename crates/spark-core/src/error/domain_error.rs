//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    // =========================================================================
    // Validation
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid location: latitude must be within [-90, 90], longitude within [-180, 180]")]
    InvalidLocation,

    #[error("Users cannot react to themselves")]
    SelfReaction,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization
    // =========================================================================
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Users {0} and {1} are not matched")]
    NotMatched(Snowflake, Snowflake),

    // =========================================================================
    // Conflict
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Conflicting write: {0}")]
    Conflict(String),

    // =========================================================================
    // Infrastructure
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidLocation => "INVALID_LOCATION",
            Self::SelfReaction => "SELF_REACTION",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotMatched(..) => "NOT_MATCHED",

            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::Conflict(_) => "CONFLICT",

            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidLocation
                | Self::SelfReaction
                | Self::ContentTooLong { .. }
        )
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotMatched(..))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::Conflict(_))
    }

    /// Transient failures the caller may retry as a whole
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }
}
