use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::api::comment::{CommentRequest, CommentResponse, CommentUpdateRequest};
use crate::api::Confirmation;
use crate::database::models::NewComment;
use crate::database::CommentStore;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::{bind, ensure_owner, found, resource_id};

/// POST /comments - Comment on an existing photo
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<CommentResponse> {
    let request = bind(payload)?;

    let comment = state
        .store
        .create_comment(NewComment {
            message: request.message.unwrap_or_default(),
            photo_id: request.photo_id.unwrap_or_default(),
            user_id: auth.id,
        })
        .await?;

    tracing::info!("Comment {} created by user {}", comment.id, auth.id);
    Ok(ApiResponse::created(comment.into()))
}

/// GET /comments - Every comment, regardless of author
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CommentResponse>> {
    let comments = state.store.list_comments().await?;
    Ok(ApiResponse::ok(comments.into_iter().map(Into::into).collect()))
}

/// PUT /comments/:id - Edit the message of one's own comment
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CommentUpdateRequest>, JsonRejection>,
) -> ApiResult<CommentResponse> {
    let id = resource_id(path)?;
    let comment = found(state.store.find_comment(id).await)?;
    ensure_owner(comment.user_id, &auth, "update this comment")?;

    let request = bind(payload)?;
    let updated = found(
        state
            .store
            .update_comment(id, request.message.unwrap_or_default())
            .await,
    )?;

    Ok(ApiResponse::ok(updated.into()))
}

/// DELETE /comments/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Confirmation> {
    let id = resource_id(path)?;
    let comment = found(state.store.find_comment(id).await)?;
    ensure_owner(comment.user_id, &auth, "delete this comment")?;

    found(state.store.delete_comment(id).await)?;

    Ok(ApiResponse::ok(Confirmation::new(
        "Your comment has been successfully deleted",
    )))
}
