//! Event stream tests
//!
//! Each event is a `data: <json>` frame carrying one message.

use std::time::Duration;

use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::Value;

const WAIT: Duration = Duration::from_secs(3);
const QUIET: Duration = Duration::from_millis(300);

#[tokio::test]
async fn test_backlog_then_live() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (ann, bob) = matched_pair(&server).await.unwrap();
    let offline = send_text(&server, &ann.id, &bob.id, "while away").await.unwrap();

    let mut events = server.open_stream(&bob.id, None).await.unwrap();

    let first = events.expect_event(WAIT).await.unwrap();
    assert_eq!(first["match_notification"], true);
    let second = events.expect_event(WAIT).await.unwrap();
    assert_eq!(second["id"], offline.id.as_str());

    let live = send_text(&server, &ann.id, &bob.id, "now").await.unwrap();
    let third = events.expect_event(WAIT).await.unwrap();
    assert_eq!(third["id"], live.id.as_str());
    assert_eq!(third["text"], "now");

    assert!(events.is_quiet(QUIET).await);
}

#[tokio::test]
async fn test_since_skips_older_messages() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (ann, bob) = matched_pair(&server).await.unwrap();
    let older = send_text(&server, &ann.id, &bob.id, "older").await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let newer = send_text(&server, &ann.id, &bob.id, "newer").await.unwrap();

    let mut events = server
        .open_stream(&bob.id, Some(&older.sent_at))
        .await
        .unwrap();
    let event = events.expect_event(WAIT).await.unwrap();
    assert_eq!(event["id"], newer.id.as_str());
    assert!(events.is_quiet(QUIET).await);
}

#[tokio::test]
async fn test_match_notification_pushed_to_both() {
    let server = TestServer::start().await.expect("Failed to start server");
    let ann = sign_up(&server, "female").await.unwrap();
    let bob = sign_up(&server, "male").await.unwrap();

    let mut ann_events = server.open_stream(&ann.id, None).await.unwrap();
    let mut bob_events = server.open_stream(&bob.id, None).await.unwrap();

    react(&server, &ann.id, &bob.id, true).await.unwrap();
    assert!(bob_events.is_quiet(QUIET).await);

    react(&server, &bob.id, &ann.id, true).await.unwrap();
    let seen_by_ann: Value = ann_events.expect_event(WAIT).await.unwrap();
    let seen_by_bob: Value = bob_events.expect_event(WAIT).await.unwrap();
    assert_eq!(seen_by_ann["match_notification"], true);
    assert_eq!(seen_by_ann["id"], seen_by_bob["id"]);
    assert_eq!(seen_by_ann["text"], "");
}

#[tokio::test]
async fn test_newer_stream_replaces_older() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (ann, bob) = matched_pair(&server).await.unwrap();

    let mut first = server.open_stream(&bob.id, None).await.unwrap();
    first.expect_event(WAIT).await.unwrap();
    let mut second = server.open_stream(&bob.id, None).await.unwrap();
    second.expect_event(WAIT).await.unwrap();

    let ended = tokio::time::timeout(WAIT, first.next_event()).await.unwrap().unwrap();
    assert!(ended.is_none());

    let sent = send_text(&server, &ann.id, &bob.id, "to the new one").await.unwrap();
    let event = second.expect_event(WAIT).await.unwrap();
    assert_eq!(event["id"], sent.id.as_str());
}

#[tokio::test]
async fn test_close_stream_and_ready_count() {
    let server = TestServer::start().await.expect("Failed to start server");
    let ann = sign_up(&server, "female").await.unwrap();

    let mut events = server.open_stream(&ann.id, None).await.unwrap();
    // Registration happens before the first byte, so the count is already visible
    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["open_streams"], 1);

    let response = server
        .delete(&format!("/api/v1/users/{}/stream", ann.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let ended = tokio::time::timeout(WAIT, events.next_event()).await.unwrap().unwrap();
    assert!(ended.is_none());
}

#[tokio::test]
async fn test_stream_for_unknown_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let result = server.open_stream("987654321", None).await;
    assert!(result.is_err());
}
