//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::helpers::{assert_json, TestServer};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Sign-up request
#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub birthday: String,
    pub sex: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SignUpRequest {
    /// A unique account near the center of Moscow
    pub fn unique(sex: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            email: format!("test{suffix}@example.com"),
            password: "TestPass123!".to_string(),
            name: format!("user{suffix}"),
            birthday: "1995-06-15".to_string(),
            sex: sex.to_string(),
            latitude: 55.75,
            longitude: 37.61,
            description: None,
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}

/// Sign-in request
#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl SignInRequest {
    pub fn from_sign_up(request: &SignUpRequest) -> Self {
        Self {
            email: request.email.clone(),
            password: request.password.clone(),
        }
    }
}

/// Profile as returned to its owner
#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub sex: String,
    pub age: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub avatar: Option<String>,
}

/// Public profile, optionally with distance
#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OutcomeResponse {
    pub outcome: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchResponse {
    pub id: String,
    pub partner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub match_id: String,
    pub from_id: String,
    pub to_id: String,
    pub text: String,
    pub sent_at: String,
    pub match_notification: bool,
}

/// Register a fresh account
pub async fn sign_up(server: &TestServer, sex: &str) -> Result<AccountResponse> {
    let response = server
        .post("/api/v1/auth/signup", &SignUpRequest::unique(sex))
        .await?;
    assert_json(response, StatusCode::CREATED).await
}

/// Submit a reaction and return the outcome name
pub async fn react(server: &TestServer, from: &str, to: &str, liked: bool) -> Result<String> {
    let response = server
        .post(
            "/api/v1/reactions",
            &json!({ "from_id": from, "to_id": to, "liked": liked }),
        )
        .await?;
    let body: OutcomeResponse = assert_json(response, StatusCode::OK).await?;
    Ok(body.outcome)
}

/// Two fresh accounts that have matched each other
pub async fn matched_pair(server: &TestServer) -> Result<(AccountResponse, AccountResponse)> {
    let ann = sign_up(server, "female").await?;
    let bob = sign_up(server, "male").await?;
    react(server, &ann.id, &bob.id, true).await?;
    let outcome = react(server, &bob.id, &ann.id, true).await?;
    anyhow::ensure!(outcome == "matched", "expected a match, got {outcome}");
    Ok((ann, bob))
}

/// Send a text message
pub async fn send_text(
    server: &TestServer,
    from: &str,
    to: &str,
    text: &str,
) -> Result<MessageResponse> {
    let response = server
        .post(
            "/api/v1/messages",
            &json!({ "from_id": from, "to_id": to, "text": text }),
        )
        .await?;
    assert_json(response, StatusCode::CREATED).await
}
