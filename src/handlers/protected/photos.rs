use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::api::photo::{PhotoRequest, PhotoResponse};
use crate::api::Confirmation;
use crate::database::models::{NewPhoto, PhotoChanges};
use crate::database::PhotoStore;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::{bind, ensure_owner, found, resource_id};

/// POST /photos - Create a photo owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<PhotoRequest>, JsonRejection>,
) -> ApiResult<PhotoResponse> {
    let request = bind(payload)?;

    let photo = state
        .store
        .create_photo(NewPhoto {
            title: request.title.unwrap_or_default(),
            caption: request.caption.unwrap_or_default(),
            photo_url: request.photo_url.unwrap_or_default(),
            user_id: auth.id,
        })
        .await?;

    tracing::info!("Photo {} created by user {}", photo.id, auth.id);
    Ok(ApiResponse::created(photo.into()))
}

/// GET /photos - The caller's own photos
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<PhotoResponse>> {
    let photos = state.store.list_photos_by_user(auth.id).await?;
    Ok(ApiResponse::ok(photos.into_iter().map(Into::into).collect()))
}

/// PUT /photos/:id - Replace title, caption and url
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PhotoRequest>, JsonRejection>,
) -> ApiResult<PhotoResponse> {
    let id = resource_id(path)?;
    let photo = found(state.store.find_photo(id).await)?;
    ensure_owner(photo.user_id, &auth, "update this photo")?;

    let request = bind(payload)?;
    let updated = found(
        state
            .store
            .update_photo(
                id,
                PhotoChanges {
                    title: request.title.unwrap_or_default(),
                    caption: request.caption.unwrap_or_default(),
                    photo_url: request.photo_url.unwrap_or_default(),
                },
            )
            .await,
    )?;

    Ok(ApiResponse::ok(updated.into()))
}

/// DELETE /photos/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Confirmation> {
    let id = resource_id(path)?;
    let photo = found(state.store.find_photo(id).await)?;
    ensure_owner(photo.user_id, &auth, "delete this photo")?;

    found(state.store.delete_photo(id).await)?;

    tracing::info!("Photo {} deleted by user {}", id, auth.id);
    Ok(ApiResponse::ok(Confirmation::new(
        "Your photo has been successfully deleted",
    )))
}
