use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::price::{NewPriceItem, PriceCategory, PriceItem, PriceItemPatch};
use service::quote::{self, Quote, QuoteRequest};
use service::ServiceError;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

pub async fn list_categories(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<PriceCategory>>, ApiError> {
    Ok(Json(state.app.prices.list_categories(&user.scope(&state)).await?))
}

pub async fn create_category(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<PriceCategory>), ApiError> {
    let category = state.app.prices.create_category(&user.scope(&state), &input.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn rename_category(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<PriceCategory>, ApiError> {
    Ok(Json(state.app.prices.rename_category(&user.scope(&state), id, &input.name).await?))
}

pub async fn delete_category(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.app.prices.delete_category(&user.scope(&state), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_items(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PriceItem>>, ApiError> {
    Ok(Json(state.app.prices.list_items(&user.scope(&state), id).await?))
}

pub async fn create_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewPriceItem>,
) -> Result<(StatusCode, Json<PriceItem>), ApiError> {
    let item = state.app.prices.create_item(&user.scope(&state), id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PriceItemPatch>,
) -> Result<Json<PriceItem>, ApiError> {
    Ok(Json(state.app.prices.update_item(&user.scope(&state), id, patch).await?))
}

pub async fn delete_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.app.prices.delete_item(&user.scope(&state), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("price item").into())
    }
}

pub async fn calculate_quote(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<Quote>, ApiError> {
    Ok(Json(quote::quote(&state.app.prices, &user.scope(&state), &request).await?))
}
