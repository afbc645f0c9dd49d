//! Live message stream
//!
//! Each event is one message serialized as `data: <json>\n\n`. The stream starts with
//! the backlog after `since`, then follows live deliveries until the client goes away
//! or opens a newer stream.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{Stream, StreamExt};
use spark_service::dto::MessageResponse;
use spark_service::MessageService;
use tracing::info;

use crate::extractors::{TimeCursor, UserIdPath};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Open the user's message stream
///
/// GET /users/{user_id}/stream
pub async fn open_stream(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    cursor: TimeCursor,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let user_id = path.user_id()?;
    let messages = MessageService::new(state.service_context())
        .open_stream(user_id, cursor.since)
        .await?;

    info!(user_id = %user_id, since = ?cursor.since, "Event stream opened");

    let events = messages.map(|message| Event::default().json_data(MessageResponse::from(message)));
    let keep_alive =
        KeepAlive::new().interval(Duration::from_secs(state.config().delivery.keep_alive_secs));

    Ok(Sse::new(events).keep_alive(keep_alive))
}

/// Close the user's stream, if any
///
/// DELETE /users/{user_id}/stream
pub async fn close_stream(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<NoContent> {
    let user_id = path.user_id()?;
    let closed = state.service_context().router().disconnect(user_id);
    info!(user_id = %user_id, closed, "Event stream close requested");
    Ok(NoContent)
}
