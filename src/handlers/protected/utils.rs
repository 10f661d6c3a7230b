use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json,
};

use crate::api::Validate;
use crate::database::{StoreError, StoreResult};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Unwrap a JSON body and run its field rules
pub fn bind<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::validation)?;
    Ok(request)
}

/// Path ids that are not integers cannot name a row
pub fn resource_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found("data not found"))
}

/// Lookup before mutation: a missing row is reported with a fixed message
pub fn found<T>(result: StoreResult<T>) -> Result<T, ApiError> {
    result.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::not_found("data not found"),
        other => other.into(),
    })
}

/// Only the owning user may touch a row; `action` reads like "update this photo"
pub fn ensure_owner(owner: Option<i64>, auth: &AuthUser, action: &str) -> Result<(), ApiError> {
    if owner == Some(auth.id) {
        return Ok(());
    }

    tracing::warn!("User {} denied: not allowed to {}", auth.id, action);
    Err(ApiError::forbidden(format!("you're not allowed to {}", action)))
}
