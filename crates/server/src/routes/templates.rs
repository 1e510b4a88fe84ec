use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::template::{Channel, MessageTemplate, NewTemplate, TemplatePatch};
use service::services::template_service::RenderedMessage;
use service::ServiceError;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct ChannelInput {
    pub channel: Channel,
    pub enabled: bool,
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<MessageTemplate>>, ApiError> {
    Ok(Json(state.app.templates.list(&user.scope(&state)).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<NewTemplate>,
) -> Result<(StatusCode, Json<MessageTemplate>), ApiError> {
    let template = state.app.templates.create(&user.scope(&state), input).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn get(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageTemplate>, ApiError> {
    let template = state.app.templates.get(&user.scope(&state), id).await?;
    template.map(Json).ok_or_else(|| ServiceError::not_found("template").into())
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TemplatePatch>,
) -> Result<Json<MessageTemplate>, ApiError> {
    Ok(Json(state.app.templates.update(&user.scope(&state), id, patch).await?))
}

pub async fn set_channel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ChannelInput>,
) -> Result<Json<MessageTemplate>, ApiError> {
    let template = state.app.templates.set_channel(&user.scope(&state), id, input.channel, input.enabled).await?;
    Ok(Json(template))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.app.templates.delete(&user.scope(&state), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("template").into())
    }
}

pub async fn render(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, appointment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RenderedMessage>, ApiError> {
    let message = state.app.templates.render_for_appointment(&user.scope(&state), id, appointment_id).await?;
    Ok(Json(message))
}
