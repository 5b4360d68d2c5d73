//! Handler-level access to the authenticated principal.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use colmena_core::Principal;

/// The caller's [`Principal`].
///
/// Reuses a principal attached by
/// [`require_principal`](crate::middleware::auth::require_principal) when
/// present; otherwise authenticates the request itself. Extraction runs after
/// routing, so requests with an unsupported method never reach the
/// credential store.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(Self(principal.clone()));
        }

        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned);

        let principal = state
            .authenticator()
            .authenticate(authorization.as_deref())
            .await?;
        parts.extensions.insert(principal.clone());
        Ok(Self(principal))
    }
}
