//! Account handlers
//!
//! Sign-up and sign-in by email and password.

use axum::{extract::State, Json};
use spark_service::dto::{CurrentUserResponse, SignInRequest, SignInResponse, SignUpRequest};
use spark_service::UserService;

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new account
///
/// POST /auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> ApiResult<Created<Json<CurrentUserResponse>>> {
    let user = UserService::new(state.service_context()).sign_up(request).await?;
    Ok(Created(Json(CurrentUserResponse::from(user))))
}

/// Check credentials and return the account id
///
/// POST /auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<SignInResponse>> {
    let user_id = UserService::new(state.service_context()).sign_in(request).await?;
    Ok(Json(SignInResponse {
        user_id: user_id.to_string(),
    }))
}
