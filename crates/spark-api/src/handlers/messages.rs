//! Message handlers

use axum::{
    extract::{Path, State},
    Json,
};
use spark_service::dto::{MessageResponse, SendMessageRequest};
use spark_service::MessageService;

use crate::extractors::{HistoryParams, UserIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Send a message to a matched user
///
/// POST /messages
pub async fn send_message(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let message = MessageService::new(state.service_context())
        .send(request.from_id, request.to_id, request.text, request.sent_at)
        .await?;
    Ok(Created(Json(MessageResponse::from(message))))
}

/// Messages addressed to or sent by the user after `since`, oldest first
///
/// GET /users/{user_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    params: HistoryParams,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let user_id = path.user_id()?;
    let messages = MessageService::new(state.service_context())
        .history(user_id, params.since, params.limit)
        .await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}
