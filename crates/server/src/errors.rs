use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use common::types::ErrorBody;
use service::auth::errors::AuthError;
use service::ServiceError;

/// Errors surfaced by handlers, mapped onto HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, Option<u16>) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            ApiError::Service(e) => {
                let status = match e {
                    ServiceError::Validation(_) | ServiceError::Model(_) => StatusCode::BAD_REQUEST,
                    ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                    ServiceError::Conflict(_) => StatusCode::CONFLICT,
                    ServiceError::Storage(_) | ServiceError::Serialization(_) | ServiceError::Notification(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, None)
            }
            ApiError::Auth(e) => {
                let status = match e {
                    AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                    AuthError::Conflict => StatusCode::CONFLICT,
                    AuthError::NotFound => StatusCode::NOT_FOUND,
                    AuthError::Unauthorized | AuthError::TokenError(_) => StatusCode::UNAUTHORIZED,
                    AuthError::Expired => StatusCode::FORBIDDEN,
                    AuthError::HashError(_) | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Some(e.code()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let msg = self.to_string();
        if status.is_server_error() {
            error!(error = %msg, "request failed");
        }
        (status, Json(ErrorBody { error: msg, code })).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
