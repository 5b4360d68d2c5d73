//! Route table.

use crate::handlers;
use crate::middleware::{auth::require_principal, cors::apply_cors};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{MethodRouter, get},
};
use tower_http::trace::TraceLayer;

/// Routes that require an authenticated caller.
///
/// Each entry is a path plus the methods it serves. Authentication is layered
/// onto the method endpoints only, so a request with an unsupported method is
/// answered with 405 before any token is looked at.
#[derive(Default)]
pub struct ProtectedRoutes {
    routes: Vec<(String, MethodRouter<AppState>)>,
}

impl ProtectedRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. `methods` must serve at least one method.
    pub fn route(mut self, path: &str, methods: MethodRouter<AppState>) -> Self {
        self.routes.push((path.to_string(), methods));
        self
    }

    fn mount(self, mut router: Router<AppState>, state: &AppState) -> Router<AppState> {
        for (path, methods) in self.routes {
            let methods = methods
                .route_layer(middleware::from_fn_with_state(state.clone(), require_principal))
                .fallback(handlers::method_not_allowed);
            router = router.route(&path, methods);
        }
        router
    }
}

/// Create the API router with only the built-in routes.
pub fn create_router(state: AppState) -> Router {
    create_router_with(state, ProtectedRoutes::new())
}

/// Create the API router, mounting `protected` behind [`require_principal`].
///
/// Handlers in `protected` can read the caller's
/// [`Principal`](colmena_core::Principal) from the request extensions or via
/// [`CurrentPrincipal`](crate::CurrentPrincipal).
pub fn create_router_with(state: AppState, protected: ProtectedRoutes) -> Router {
    let router = Router::new()
        .route(
            "/healthz",
            get(handlers::healthz).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/auth/me",
            get(handlers::me).fallback(handlers::method_not_allowed),
        );

    protected
        .mount(router, &state)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), apply_cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
