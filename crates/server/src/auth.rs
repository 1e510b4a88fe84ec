use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;
use uuid::Uuid;

use service::auth::errors::AuthError;
use service::storage::UserScope;
use service::StudioApp;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub app: Arc<StudioApp>,
}

impl ServerState {
    pub fn new(app: StudioApp) -> Self {
        Self { app: Arc::new(app) }
    }
}

/// Account resolved from the bearer token, injected by [`require_bearer_token`].
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser(pub Uuid);

impl CurrentUser {
    pub fn scope(&self, state: &ServerState) -> UserScope {
        state.app.scope(self.0)
    }
}

fn bearer(req: &Request) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

async fn authenticate(state: &ServerState, path: String, token: Option<String>, check_access: bool) -> Result<Uuid, ApiError> {
    let Some(token) = token else {
        warn!(path = %path, "missing or malformed Authorization header");
        return Err(AuthError::Unauthorized.into());
    };

    let account_id = state.app.auth.verify_token(&token).map_err(|e| {
        warn!(path = %path, err = %e, "token validation failed");
        AuthError::Unauthorized
    })?;
    let checked = if check_access {
        state.app.auth.require_access(account_id).await.map(|_| ())
    } else {
        state.app.auth.get_user(account_id).await.map(|_| ())
    };
    // a deleted account keeps a valid signature until expiry
    checked.map_err(|e| match e {
        AuthError::NotFound => ApiError::from(AuthError::Unauthorized),
        other => ApiError::from(other),
    })?;
    Ok(account_id)
}

/// Verify `Authorization: Bearer <token>` and that the account still has
/// access (trial or paid), then hand the account id to the handler.
pub async fn require_bearer_token(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    match authenticate(&state, req.uri().path().to_string(), bearer(&req), true).await {
        Ok(id) => {
            req.extensions_mut().insert(CurrentUser(id));
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Like [`require_bearer_token`] but lets expired accounts through, for the
/// account routes that must work after the trial ends.
pub async fn require_signed_in(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    match authenticate(&state, req.uri().path().to_string(), bearer(&req), false).await {
        Ok(id) => {
            req.extensions_mut().insert(CurrentUser(id));
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}
