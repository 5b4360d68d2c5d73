//! End-to-end behavior of the HTTP API against an in-memory credential store.

use axum::{
    Extension, Json, Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
    routing::get,
};
use colmena_auth::memory::InMemoryCredentialStore;
use colmena_core::{IdentityConfig, IdentityRecord, MissingRolePolicy, Principal, Role, UserMetadata};
use colmena_server::{AppState, CurrentPrincipal, ProtectedRoutes, routes};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn store() -> Arc<InMemoryCredentialStore> {
    Arc::new(
        InMemoryCredentialStore::new()
            .with_user(
                "abc123",
                IdentityRecord {
                    id: "u1".to_string(),
                    email: Some("a@x.com".to_string()),
                    user_metadata: UserMetadata {
                        role: Some("teacher".to_string()),
                        first_name: Some("Ana".to_string()),
                        ..Default::default()
                    },
                },
            )
            .with_user(
                "no-role",
                IdentityRecord {
                    id: "u2".to_string(),
                    email: Some("b@x.com".to_string()),
                    user_metadata: UserMetadata::default(),
                },
            ),
    )
}

fn app(store: Arc<InMemoryCredentialStore>) -> Router {
    routes::create_router(AppState::with_store(store, IdentityConfig::default()))
}

fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_me_returns_principal() {
    let store = store();
    let response = app(store.clone())
        .oneshot(request(Method::GET, "/api/auth/me", Some("abc123")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        json_body(response).await,
        json!({
            "id": "u1",
            "email": "a@x.com",
            "role": "teacher",
            "first_name": "Ana",
            "last_name": "Colmena"
        })
    );
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_missing_header_is_401_without_store_call() {
    let store = store();
    let response = app(store.clone())
        .oneshot(request(Method::GET, "/api/auth/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, json!({ "error": "Token no proporcionado" }));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_invalid_token_is_401_with_one_store_call() {
    let store = store();
    let response = app(store.clone())
        .oneshot(request(Method::GET, "/api/auth/me", Some("forged")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, json!({ "error": "Token inválido" }));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_missing_role_uses_default() {
    let response = app(store())
        .oneshot(request(Method::GET, "/api/auth/me", Some("no-role")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["role"], "family");
    assert_eq!(body["first_name"], "Usuario");
    assert_eq!(body["last_name"], "Colmena");
}

#[tokio::test]
async fn test_missing_role_rejected_when_configured() {
    let state = AppState::with_store(
        store(),
        IdentityConfig {
            missing_role: MissingRolePolicy::Reject,
            ..Default::default()
        },
    );
    let response = routes::create_router(state)
        .oneshot(request(Method::GET, "/api/auth/me", Some("no-role")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await, json!({ "error": "Rol no asignado" }));
}

#[tokio::test]
async fn test_wrong_method_is_405_before_auth() {
    for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        for token in [None, Some("abc123"), Some("forged")] {
            let store = store();
            let response = app(store.clone())
                .oneshot(request(method.clone(), "/api/auth/me", token))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {token:?}");
            assert_eq!(json_body(response).await, json!({ "error": "Método no permitido" }));
            assert_eq!(store.calls(), 0);
        }
    }
}

#[tokio::test]
async fn test_options_is_empty_200_with_cors() {
    for token in [None, Some("abc123"), Some("forged")] {
        let store = store();
        let response = app(store.clone())
            .oneshot(request(Method::OPTIONS, "/api/auth/me", token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
        assert_eq!(store.calls(), 0);
    }
}

#[tokio::test]
async fn test_upstream_failure_is_502() {
    let store = Arc::new(InMemoryCredentialStore::new().unavailable());
    let response = app(store)
        .oneshot(request(Method::GET, "/api/auth/me", Some("abc123")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Servicio de autenticación no disponible" })
    );
}

#[tokio::test]
async fn test_healthz_and_unknown_route() {
    let response = app(store())
        .oneshot(request(Method::GET, "/healthz", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["ok"], true);

    let response = app(store())
        .oneshot(request(Method::GET, "/api/students", Some("abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Ruta no encontrada" }));
}

async fn list_students(Extension(principal): Extension<Principal>) -> Json<Value> {
    Json(json!({ "requested_by": principal.id, "role": principal.role }))
}

async fn my_family(CurrentPrincipal(principal): CurrentPrincipal) -> Json<Value> {
    Json(json!({ "family_id": principal.family_id }))
}

fn app_with_protected(store: Arc<InMemoryCredentialStore>) -> Router {
    let protected = ProtectedRoutes::new()
        .route("/api/students", get(list_students))
        .route("/api/families/mine", get(my_family));
    routes::create_router_with(AppState::with_store(store, IdentityConfig::default()), protected)
}

#[tokio::test]
async fn test_protected_routes_see_principal() {
    let store = store();
    let app = app_with_protected(store.clone());

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/students", Some("abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "requested_by": "u1", "role": "teacher" })
    );

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/families/mine", Some("abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "family_id": null }));

    // The extractor reuses the principal attached by the middleware.
    assert_eq!(store.calls(), 2);

    let response = app
        .oneshot(request(Method::GET, "/api/students", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, json!({ "error": "Token no proporcionado" }));
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_protected_wrong_method_is_405_before_auth() {
    for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        for token in [None, Some("abc123"), Some("forged")] {
            let store = store();
            let response = app_with_protected(store.clone())
                .oneshot(request(method.clone(), "/api/students", token))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {token:?}");
            assert_eq!(json_body(response).await, json!({ "error": "Método no permitido" }));
            assert_eq!(store.calls(), 0);
        }
    }
}

#[tokio::test]
async fn test_options_answers_any_path() {
    for uri in ["/api/students", "/api/unknown/thing", "/healthz"] {
        let store = store();
        let response = app_with_protected(store.clone())
            .oneshot(request(Method::OPTIONS, uri, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
        assert_eq!(store.calls(), 0);
    }
}

#[tokio::test]
async fn test_head_is_served_like_get() {
    let store = store();
    let app = app_with_protected(store.clone());

    let response = app
        .clone()
        .oneshot(request(Method::HEAD, "/api/auth/me", Some("abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.calls(), 1);

    let response = app
        .clone()
        .oneshot(request(Method::HEAD, "/api/auth/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(request(Method::HEAD, "/api/students", Some("abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.calls(), 2);
}

async fn staff_only(CurrentPrincipal(principal): CurrentPrincipal) -> Result<Json<Value>, StatusCode> {
    if !principal.has_role_at_least(Role::Teacher) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(json!({ "admin": principal.is_admin() })))
}

#[tokio::test]
async fn test_protected_handlers_gate_on_role() {
    let store = store();
    let app = routes::create_router_with(
        AppState::with_store(store.clone(), IdentityConfig::default()),
        ProtectedRoutes::new().route("/api/staff", get(staff_only)),
    );

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/staff", Some("abc123")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "admin": false }));

    // No role in metadata: defaults to family.
    let response = app
        .oneshot(request(Method::GET, "/api/staff", Some("no-role")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.calls(), 2);
}
