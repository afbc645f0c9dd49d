//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use spark_core::entities::Sex;
use spark_core::MatchOutcome;

// ============================================================================
// Account Responses
// ============================================================================

/// Public profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub birthday: NaiveDate,
    pub sex: Sex,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    /// URL under `/static`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile returned to its owner (includes email)
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub profile: UserResponse,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub user_id: String,
}

/// Recommended profile with its distance from the requester
#[derive(Debug, Clone, Serialize)]
pub struct CandidateResponse {
    #[serde(flatten)]
    pub profile: UserResponse,
    pub distance_km: f64,
}

// ============================================================================
// Match Responses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReactionOutcomeResponse {
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub from_id: String,
    pub to_id: String,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

/// A match seen from one of its two users
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub id: String,
    pub partner_id: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Message Responses
// ============================================================================

/// Message as stored and as pushed over the event stream
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub match_id: String,
    pub from_id: String,
    pub to_id: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    /// Set on the empty message announcing a new match
    pub match_notification: bool,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
    pub open_streams: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool, open_streams: usize) -> Self {
        Self {
            status: if storage_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
            open_streams,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
