use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::catalog::{DesignFolder, DesignImage, NewFolder, NewImage};
use service::ServiceError;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct TagQuery {
    pub tag: String,
}

#[derive(Deserialize)]
pub struct MoveInput {
    pub folder_id: Uuid,
}

#[derive(Serialize)]
pub struct FolderDeleted {
    pub images_removed: usize,
}

pub async fn list_folders(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<DesignFolder>>, ApiError> {
    Ok(Json(state.app.catalog.list_folders(&user.scope(&state)).await?))
}

pub async fn create_folder(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<NewFolder>,
) -> Result<(StatusCode, Json<DesignFolder>), ApiError> {
    let folder = state.app.catalog.create_folder(&user.scope(&state), input).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

pub async fn get_folder(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DesignFolder>, ApiError> {
    let folder = state.app.catalog.get_folder(&user.scope(&state), id).await?;
    folder.map(Json).ok_or_else(|| ServiceError::not_found("folder").into())
}

pub async fn rename_folder(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewFolder>,
) -> Result<Json<DesignFolder>, ApiError> {
    Ok(Json(state.app.catalog.rename_folder(&user.scope(&state), id, input).await?))
}

pub async fn delete_folder(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<FolderDeleted>, ApiError> {
    let images_removed = state.app.catalog.delete_folder(&user.scope(&state), id).await?;
    Ok(Json(FolderDeleted { images_removed }))
}

pub async fn list_images(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DesignImage>>, ApiError> {
    Ok(Json(state.app.catalog.list_images(&user.scope(&state), id).await?))
}

pub async fn add_image(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewImage>,
) -> Result<(StatusCode, Json<DesignImage>), ApiError> {
    let image = state.app.catalog.add_image(&user.scope(&state), id, input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn find_by_tag(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<TagQuery>,
) -> Result<Json<Vec<DesignImage>>, ApiError> {
    Ok(Json(state.app.catalog.find_by_tag(&user.scope(&state), &q.tag).await?))
}

pub async fn remove_image(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.app.catalog.remove_image(&user.scope(&state), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("image").into())
    }
}

pub async fn move_image(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<MoveInput>,
) -> Result<Json<DesignImage>, ApiError> {
    Ok(Json(state.app.catalog.move_image(&user.scope(&state), id, input.folder_id).await?))
}
