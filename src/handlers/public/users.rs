use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::api::user::{LoginRequest, RegisterRequest, UserCreateResponse, UserLoginResponse};
use crate::auth::password::{hash_password, verify_dummy, verify_password};
use crate::database::models::NewUser;
use crate::database::{StoreError, UserStore};
use crate::error::ApiError;
use crate::handlers::protected::utils::bind;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Same answer for unknown email and wrong password
const LOGIN_FAILED: &str = "username / password is not match";

/// Argon2 work runs off the async workers
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!("spawn_blocking join error: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}

/// POST /users/register - Create an account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<UserCreateResponse> {
    let request = bind(payload)?;

    let plaintext = request.password.unwrap_or_default();
    let password = blocking(move || hash_password(&plaintext)).await??;
    let user = state
        .store
        .create_user(NewUser {
            username: request.username.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password,
            // range-checked to 8..=99 by the validator
            age: request.age.unwrap_or_default() as i32,
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.id, user.username);
    Ok(ApiResponse::created(user.into()))
}

/// POST /users/login - Exchange email and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<UserLoginResponse> {
    let Json(LoginRequest { email, password }) = payload?;

    let user = match state.store.find_user_by_email(&email).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            blocking(move || verify_dummy(&password)).await?;
            return Err(ApiError::unauthorized(LOGIN_FAILED));
        }
        Err(other) => return Err(other.into()),
    };

    let digest = user.password.clone();
    if !blocking(move || verify_password(&digest, &password)).await? {
        tracing::debug!("Password mismatch for user {}", user.id);
        return Err(ApiError::unauthorized(LOGIN_FAILED));
    }

    let token = state.tokens.issue(user.id, &user.email)?;
    Ok(ApiResponse::ok(UserLoginResponse { token }))
}
