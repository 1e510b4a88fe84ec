use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use service::auth::domain::{AuthSession, AuthUser, ChangePasswordInput, LoginInput, RegisterInput};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct SubscriptionInput {
    pub months: u32,
}

#[derive(Serialize)]
pub struct DeleteAccountOutput {
    pub keys_removed: usize,
}

pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<(StatusCode, Json<AuthUser>), ApiError> {
    let user = state.app.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(State(state): State<ServerState>, Json(input): Json<LoginInput>) -> Result<Json<AuthSession>, ApiError> {
    Ok(Json(state.app.auth.login(input).await?))
}

pub async fn me(State(state): State<ServerState>, Extension(user): Extension<CurrentUser>) -> Result<Json<AuthUser>, ApiError> {
    Ok(Json(state.app.auth.get_user(user.0).await?))
}

pub async fn logout(State(state): State<ServerState>) -> Result<StatusCode, ApiError> {
    state.app.auth.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<ChangePasswordInput>,
) -> Result<StatusCode, ApiError> {
    state.app.auth.change_password(user.0, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn activate_subscription(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<SubscriptionInput>,
) -> Result<Json<AuthUser>, ApiError> {
    Ok(Json(state.app.auth.activate_subscription(user.0, input.months).await?))
}

pub async fn cancel_subscription(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<AuthUser>, ApiError> {
    Ok(Json(state.app.auth.cancel_subscription(user.0).await?))
}

pub async fn delete_account(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<DeleteAccountOutput>, ApiError> {
    let keys_removed = state.app.delete_account(user.0).await?;
    Ok(Json(DeleteAccountOutput { keys_removed }))
}
