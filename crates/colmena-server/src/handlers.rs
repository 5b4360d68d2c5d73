//! Request handlers.

use crate::error::ApiError;
use crate::extract::CurrentPrincipal;
use axum::Json;
use colmena_core::{Principal, Role};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Body of a successful authentication check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

impl From<Principal> for MeResponse {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            email: p.email,
            role: p.role,
            first_name: p.first_name,
            last_name: p.last_name,
        }
    }
}

/// `GET /api/auth/me`
pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<MeResponse> {
    tracing::debug!(user_id = %principal.id, "authentication check passed");
    Json(principal.into())
}

/// `GET /healthz`
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "colmena-server" }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
