use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// Authenticate once and attach the [`Principal`](colmena_core::Principal) to
/// the request extensions.
///
/// Mounted per method endpoint by [`ProtectedRoutes`](crate::ProtectedRoutes),
/// so it only runs once a handler has matched.
pub async fn require_principal(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let principal = state
        .authenticator()
        .authenticate(authorization.as_deref())
        .await?;

    tracing::debug!(user_id = %principal.id, role = %principal.role, "request authenticated");
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
