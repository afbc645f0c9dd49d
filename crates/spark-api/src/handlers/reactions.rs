//! Reaction and match handlers

use axum::{
    extract::{Path, State},
    Json,
};
use spark_service::dto::{MatchResponse, ReactionOutcomeResponse, ReactionRequest, ReactionResponse};
use spark_service::MatchService;

use crate::extractors::{UserIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Like or pass on another user
///
/// POST /reactions
pub async fn submit_reaction(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ReactionRequest>,
) -> ApiResult<Json<ReactionOutcomeResponse>> {
    let outcome = MatchService::new(state.service_context())
        .submit_reaction(request.from_id, request.to_id, request.liked)
        .await?;
    Ok(Json(ReactionOutcomeResponse { outcome }))
}

/// Reactions the user has sent
///
/// GET /users/{user_id}/reactions
pub async fn get_reactions(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    let user_id = path.user_id()?;
    let reactions = MatchService::new(state.service_context())
        .outgoing_reactions(user_id)
        .await?;
    Ok(Json(reactions.iter().map(ReactionResponse::from).collect()))
}

/// The user's matches, newest first
///
/// GET /users/{user_id}/matches
pub async fn get_matches(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<Vec<MatchResponse>>> {
    let user_id = path.user_id()?;
    let matches = MatchService::new(state.service_context())
        .list_matches(user_id)
        .await?;
    Ok(Json(
        matches
            .iter()
            .map(|record| MatchResponse::for_viewer(record, user_id))
            .collect(),
    ))
}
