use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::api::social::{SocialRequest, SocialResponse};
use crate::api::Confirmation;
use crate::database::models::{NewSocial, SocialChanges};
use crate::database::SocialStore;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::{bind, ensure_owner, found, resource_id};

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<SocialRequest>, JsonRejection>,
) -> ApiResult<SocialResponse> {
    let request = bind(payload)?;

    let social = state
        .store
        .create_social(NewSocial {
            name: request.name.unwrap_or_default(),
            social_media_url: request.social_media_url.unwrap_or_default(),
            user_id: auth.id,
        })
        .await?;

    tracing::info!("Social media {} created by user {}", social.id, auth.id);
    Ok(ApiResponse::created(social.into()))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<SocialResponse>> {
    let socials = state.store.list_socials_by_user(auth.id).await?;
    Ok(ApiResponse::ok(socials.into_iter().map(Into::into).collect()))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SocialRequest>, JsonRejection>,
) -> ApiResult<SocialResponse> {
    let id = resource_id(path)?;
    let social = found(state.store.find_social(id).await)?;
    ensure_owner(social.user_id, &auth, "update this social media")?;

    let request = bind(payload)?;
    let updated = found(
        state
            .store
            .update_social(
                id,
                SocialChanges {
                    name: request.name.unwrap_or_default(),
                    social_media_url: request.social_media_url.unwrap_or_default(),
                },
            )
            .await,
    )?;

    Ok(ApiResponse::ok(updated.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Confirmation> {
    let id = resource_id(path)?;
    let social = found(state.store.find_social(id).await)?;
    ensure_owner(social.user_id, &auth, "delete this social media")?;

    found(state.store.delete_social(id).await)?;

    Ok(ApiResponse::ok(Confirmation::new(
        "Your social media has been successfully deleted",
    )))
}
