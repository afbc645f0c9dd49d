//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use spark_core::entities::Sex;
use spark_core::Snowflake;
use validator::Validate;

// ============================================================================
// Account Requests
// ============================================================================

/// Sign-up request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,

    /// `YYYY-MM-DD`
    pub birthday: NaiveDate,

    pub sex: Sex,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be within [-90, 90]"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be within [-180, 180]"))]
    pub longitude: f64,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Sign-in request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: Option<String>,

    pub birthday: Option<NaiveDate>,

    pub sex: Option<Sex>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be within [-90, 90]"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be within [-180, 180]"))]
    pub longitude: Option<f64>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

// ============================================================================
// Match Requests
// ============================================================================

/// Like or pass from one user toward another
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReactionRequest {
    pub from_id: Snowflake,
    pub to_id: Snowflake,
    pub liked: bool,
}

/// Candidate search filters
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecommendationQuery {
    pub sex: Option<Sex>,

    #[validate(range(max = 150, message = "min_age must be at most 150"))]
    pub min_age: Option<u32>,

    #[validate(range(max = 150, message = "max_age must be at most 150"))]
    pub max_age: Option<u32>,

    /// Kilometres from the requester
    #[validate(range(min = 0.0, message = "distance must not be negative"))]
    pub distance: Option<f64>,

    pub limit: Option<i64>,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub from_id: Snowflake,
    pub to_id: Snowflake,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub text: String,

    /// Defaults to the time the server accepts the message
    pub sent_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_core::entities::MAX_MESSAGE_LENGTH;

    #[test]
    fn test_sign_up_validation() {
        let valid: SignUpRequest = serde_json::from_value(serde_json::json!({
            "email": "ann@example.com",
            "password": "long enough",
            "name": "Ann",
            "birthday": "1995-06-01",
            "sex": "female",
            "latitude": 55.75,
            "longitude": 37.62
        }))
        .unwrap();
        assert!(valid.validate().is_ok());

        let mut bad = valid.clone();
        bad.latitude = 91.0;
        bad.password = "short".to_string();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_reaction_request_accepts_string_ids() {
        let request: ReactionRequest =
            serde_json::from_str(r#"{"from_id":"10","to_id":11,"liked":true}"#).unwrap();
        assert_eq!(request.from_id, Snowflake::new(10));
        assert_eq!(request.to_id, Snowflake::new(11));
    }

    #[test]
    fn test_message_text_bounds() {
        let mut request = SendMessageRequest {
            from_id: Snowflake::new(1),
            to_id: Snowflake::new(2),
            text: String::new(),
            sent_at: None,
        };
        assert!(request.validate().is_err());

        request.text = "x".repeat(MAX_MESSAGE_LENGTH);
        assert!(request.validate().is_ok());

        request.text.push('x');
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_recommendation_query_rejects_negative_distance() {
        let query = RecommendationQuery {
            distance: Some(-1.0),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }
}
