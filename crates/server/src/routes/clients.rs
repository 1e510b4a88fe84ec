use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::client::{Client, ClientPatch, NewClient};
use service::pagination::{Page, Pagination};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(page): Query<Pagination>,
) -> Result<Json<Page<Client>>, ApiError> {
    Ok(Json(state.app.clients.list_paginated(&user.scope(&state), page).await?))
}

pub async fn search(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.app.clients.search(&user.scope(&state), &query.q).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<NewClient>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let client = state.app.clients.create(&user.scope(&state), input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn get(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, ApiError> {
    Ok(Json(state.app.clients.require(&user.scope(&state), id).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ClientPatch>,
) -> Result<Json<Client>, ApiError> {
    Ok(Json(state.app.clients.update(&user.scope(&state), id, patch).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.app.clients.delete(&user.scope(&state), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(service::ServiceError::not_found("client").into())
    }
}
