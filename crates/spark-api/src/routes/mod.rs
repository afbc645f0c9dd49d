//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use spark_common::AppConfig;
use spark_service::dto::STATIC_PREFIX;
use tower_http::{services::ServeDir, timeout::TimeoutLayer};

use crate::handlers::{auth, health, messages, reactions, stream, users};
use crate::state::AppState;

/// Room for multipart framing on top of the image itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .nest("/api/v1", api_v1_routes(config))
        .nest_service(STATIC_PREFIX, ServeDir::new(&config.storage.upload_dir))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
///
/// Event streams stay open indefinitely, so only request/response routes get the timeout.
fn api_v1_routes(config: &AppConfig) -> Router<AppState> {
    let timed = Router::new()
        .merge(auth_routes())
        .merge(user_routes(config.storage.max_upload_bytes))
        .merge(reaction_routes())
        .merge(message_routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            Duration::from_secs(config.server.request_timeout_secs),
        ));

    Router::new().merge(timed).merge(stream_routes())
}

/// Account routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
}

/// User routes
fn user_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/users/:user_id", get(users::get_user).patch(users::update_user))
        .route(
            "/users/:user_id/avatar",
            put(users::upload_avatar)
                .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/users/:user_id/recommendations", get(users::get_recommendations))
}

/// Reaction and match routes
fn reaction_routes() -> Router<AppState> {
    Router::new()
        .route("/reactions", post(reactions::submit_reaction))
        .route("/users/:user_id/reactions", get(reactions::get_reactions))
        .route("/users/:user_id/matches", get(reactions::get_matches))
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(messages::send_message))
        .route("/users/:user_id/messages", get(messages::get_messages))
}

/// Event stream routes
fn stream_routes() -> Router<AppState> {
    Router::new().route(
        "/users/:user_id/stream",
        get(stream::open_stream).delete(stream::close_stream),
    )
}
