//! Path parameter extractors

use spark_core::Snowflake;

use crate::response::ApiError;

/// Path parameters with user_id
#[derive(Debug, serde::Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        self.user_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parsing() {
        let path = UserIdPath {
            user_id: "42".to_string(),
        };
        assert_eq!(path.user_id().unwrap(), Snowflake::new(42));

        let path = UserIdPath {
            user_id: "abc".to_string(),
        };
        assert_eq!(path.user_id().unwrap_err().error_code(), "INVALID_PATH_PARAMETER");
    }
}
