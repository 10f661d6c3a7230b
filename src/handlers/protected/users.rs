use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::api::user::{UserCreateResponse, UserUpdateRequest, UserUpdateResponse};
use crate::api::Confirmation;
use crate::database::models::UserChanges;
use crate::database::{StoreError, UserStore};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::bind;

/// GET /users - All registered users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserCreateResponse>> {
    let users = state.store.list_users().await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// PUT /users - Change the caller's own username and/or email
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<UserUpdateRequest>, JsonRejection>,
) -> ApiResult<UserUpdateResponse> {
    let request = bind(payload)?;

    let changes = UserChanges {
        username: request.username.filter(|s| !s.trim().is_empty()),
        email: request.email.filter(|s| !s.trim().is_empty()),
    };

    let user = state
        .store
        .update_user(auth.id, changes)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => ApiError::not_found("User data not found"),
            other => other.into(),
        })?;

    Ok(ApiResponse::ok(user.into()))
}

/// DELETE /users - Soft delete the caller's own account
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Confirmation> {
    state.store.delete_user(auth.id).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::not_found("User not found"),
        other => other.into(),
    })?;

    tracing::info!("User {} deleted their account", auth.id);
    Ok(ApiResponse::ok(Confirmation::new(
        "Your account has been successfully deleted",
    )))
}
