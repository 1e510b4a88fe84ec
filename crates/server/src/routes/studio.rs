use axum::{extract::State, Extension, Json};

use models::studio::{StudioData, StudioPatch};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

pub async fn get(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<StudioData>, ApiError> {
    Ok(Json(state.app.studio.get(&user.scope(&state)).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(patch): Json<StudioPatch>,
) -> Result<Json<StudioData>, ApiError> {
    Ok(Json(state.app.studio.update(&user.scope(&state), patch).await?))
}
