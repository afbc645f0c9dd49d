//! User handlers
//!
//! Profiles, avatars and recommendations.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use spark_service::dto::{
    CandidateResponse, CurrentUserResponse, RecommendationQuery, UpdateProfileRequest,
    UserResponse,
};
use spark_service::{RecommendationService, UserService};
use tracing::debug;

use crate::extractors::{UserIdPath, ValidatedJson, ValidatedQuery};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the avatar image
pub const AVATAR_FIELD: &str = "img";

/// Get user by ID
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = path.user_id()?;
    let user = UserService::new(state.service_context()).get(user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update profile fields that are present in the body
///
/// PATCH /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let user_id = path.user_id()?;
    let user = UserService::new(state.service_context())
        .update_profile(user_id, request)
        .await?;
    Ok(Json(CurrentUserResponse::from(user)))
}

/// Replace the avatar with the `img` field of a multipart upload
///
/// PUT /users/{user_id}/avatar
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    mut multipart: Multipart,
) -> ApiResult<Json<UserResponse>> {
    let user_id = path.user_id()?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_body(e.body_text()))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        let user = UserService::new(state.service_context())
            .set_avatar(user_id, &filename, &bytes)
            .await?;
        return Ok(Json(UserResponse::from(user)));
    }

    Err(ApiError::invalid_body(format!(
        "missing multipart field '{AVATAR_FIELD}'"
    )))
}

/// Nearby profiles the user has not reacted to yet
///
/// GET /users/{user_id}/recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    ValidatedQuery(query): ValidatedQuery<RecommendationQuery>,
) -> ApiResult<Json<Vec<CandidateResponse>>> {
    let user_id = path.user_id()?;
    let (requester, candidates) = RecommendationService::new(state.service_context())
        .recommend(user_id, query)
        .await?;

    let response = candidates
        .iter()
        .map(|candidate| CandidateResponse::new(&requester, candidate))
        .collect();
    Ok(Json(response))
}
