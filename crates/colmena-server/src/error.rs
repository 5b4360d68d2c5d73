//! Error types for the server crate.
//!
//! Every failure is rendered as `{ "error": <message> }`. Messages are the
//! fixed client-facing strings; upstream details stay in the logs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use colmena_auth::AuthError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The path exists but not for this method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// No route for this path.
    #[error("route not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Auth(AuthError::RoleNotAssigned) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::Auth(err) => err.public_message(),
            ApiError::MethodNotAllowed => "Método no permitido",
            ApiError::NotFound => "Ruta no encontrada",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}
