//! API Integration Tests
//!
//! Run against the in-memory store by default. Set `SPARK_TEST_DATABASE_URL` to
//! exercise a PostgreSQL instance instead.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["open_streams"], 0);
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_sign_up_and_sign_in() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignUpRequest::unique("female");

    let response = server.post("/api/v1/auth/signup", &request).await.unwrap();
    let account: AccountResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(account.email, request.email);
    assert_eq!(account.sex, "female");
    assert!(account.age >= 30);

    let response = server
        .post("/api/v1/auth/signin", &SignInRequest::from_sign_up(&request))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["user_id"], account.id);
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignUpRequest::unique("male");
    server.post("/api/v1/auth/signup", &request).await.unwrap();

    let response = server
        .post(
            "/api/v1/auth/signin",
            &json!({ "email": request.email, "password": "wrong password" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_sign_up_duplicate_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignUpRequest::unique("male");

    server.post("/api/v1/auth/signup", &request).await.unwrap();
    let response = server.post("/api/v1/auth/signup", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_sign_up_rejects_bad_location() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignUpRequest::unique("male").at(91.0, 0.0);

    let response = server.post("/api/v1/auth/signup", &request).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_update_profile() {
    let server = TestServer::start().await.expect("Failed to start server");
    let account = sign_up(&server, "female").await.unwrap();

    let response = server
        .patch(
            &format!("/api/v1/users/{}", account.id),
            &json!({ "description": "climbing", "longitude": 30.0 }),
        )
        .await
        .unwrap();
    let updated: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.description, "climbing");
    assert!((updated.longitude - 30.0).abs() < f64::EPSILON);
    assert!((updated.latitude - account.latitude).abs() < f64::EPSILON);
    assert_eq!(updated.name, account.name);
}

#[tokio::test]
async fn test_avatar_upload_is_served() {
    let server = TestServer::start().await.expect("Failed to start server");
    let account = sign_up(&server, "female").await.unwrap();
    let image = b"\x89PNG not really".to_vec();

    let response = server
        .put_file(
            &format!("/api/v1/users/{}/avatar", account.id),
            "me.png",
            image.clone(),
        )
        .await
        .unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let url = profile.avatar.expect("avatar url");
    assert!(url.starts_with("/static/"));

    let response = server.get(&url).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().to_vec(), image);
}

#[tokio::test]
async fn test_avatar_rejects_unknown_extension() {
    let server = TestServer::start().await.expect("Failed to start server");
    let account = sign_up(&server, "female").await.unwrap();

    let response = server
        .put_file(
            &format!("/api/v1/users/{}/avatar", account.id),
            "script.sh",
            b"echo".to_vec(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Recommendation Tests
// ============================================================================

#[tokio::test]
async fn test_recommendations_filter_and_sort() {
    let server = TestServer::start().await.expect("Failed to start server");
    let me = sign_up(&server, "male").await.unwrap();

    let far_request = SignUpRequest::unique("female").at(55.80, 37.61);
    let response = server.post("/api/v1/auth/signup", &far_request).await.unwrap();
    let farther: AccountResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let nearer = sign_up(&server, "female").await.unwrap();
    let skipped = sign_up(&server, "female").await.unwrap();
    react(&server, &me.id, &skipped.id, false).await.unwrap();

    let response = server
        .get(&format!(
            "/api/v1/users/{}/recommendations?sex=female&distance=20",
            me.id
        ))
        .await
        .unwrap();
    let found: Vec<ProfileResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<_> = found.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![nearer.id.as_str(), farther.id.as_str()]);
    assert!(found[0].distance_km.unwrap() < found[1].distance_km.unwrap());
}

// ============================================================================
// Reaction and Match Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_outcomes() {
    let server = TestServer::start().await.expect("Failed to start server");
    let ann = sign_up(&server, "female").await.unwrap();
    let bob = sign_up(&server, "male").await.unwrap();
    let cat = sign_up(&server, "female").await.unwrap();

    assert_eq!(react(&server, &ann.id, &bob.id, true).await.unwrap(), "pending");
    assert_eq!(react(&server, &bob.id, &ann.id, true).await.unwrap(), "matched");
    assert_eq!(react(&server, &cat.id, &bob.id, false).await.unwrap(), "back_filled");
    assert_eq!(react(&server, &bob.id, &cat.id, true).await.unwrap(), "no_match");

    let response = server
        .get(&format!("/api/v1/users/{}/matches", bob.id))
        .await
        .unwrap();
    let matches: Vec<MatchResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].partner_id, ann.id);

    let response = server
        .get(&format!("/api/v1/users/{}/reactions", bob.id))
        .await
        .unwrap();
    let reactions: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(reactions.len(), 2);
}

#[tokio::test]
async fn test_reaction_to_unknown_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let ann = sign_up(&server, "female").await.unwrap();

    let response = server
        .post(
            "/api/v1/reactions",
            &json!({ "from_id": ann.id, "to_id": "123456789", "liked": true }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_USER");
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_message_between_matched_users() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (ann, bob) = matched_pair(&server).await.unwrap();

    let sent = send_text(&server, &ann.id, &bob.id, "hello").await.unwrap();
    assert_eq!(sent.from_id, ann.id);
    assert!(!sent.match_notification);

    let response = server
        .get(&format!("/api/v1/users/{}/messages", bob.id))
        .await
        .unwrap();
    let history: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].match_notification);
    assert_eq!(history[1].id, sent.id);
}

#[tokio::test]
async fn test_message_requires_match() {
    let server = TestServer::start().await.expect("Failed to start server");
    let ann = sign_up(&server, "female").await.unwrap();
    let bob = sign_up(&server, "male").await.unwrap();

    let response = server
        .post(
            "/api/v1/messages",
            &json!({ "from_id": ann.id, "to_id": bob.id, "text": "hi" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_MATCHED");
}

#[tokio::test]
async fn test_message_text_too_long() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (ann, bob) = matched_pair(&server).await.unwrap();

    let response = server
        .post(
            "/api/v1/messages",
            &json!({ "from_id": ann.id, "to_id": bob.id, "text": "x".repeat(2001) }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
