//! HTTP client for the hosted identity service (GoTrue API).
//!
//! Every request carries the service key in the `apikey` header. Token
//! verification additionally sends the user's token as the bearer credential;
//! admin endpoints send the service key as the bearer credential.

use crate::error::StoreError;
use crate::store::CredentialStore;
use async_trait::async_trait;
use colmena_core::{IdentityRecord, ResolvedCredentialStore};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const API_PREFIX: &str = "/auth/v1";

/// Page size used when scanning the admin user listing.
const ADMIN_PAGE_SIZE: u32 = 200;

/// Upper bound on pages scanned by [`GoTrueClient::find_user_by_email`].
const ADMIN_MAX_PAGES: u32 = 100;

/// Service health as reported by the identity service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
}

/// Tokens issued by a successful sign-in.
#[derive(Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<IdentityRecord>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Deserialize)]
struct UserPage {
    #[serde(default)]
    users: Vec<IdentityRecord>,
}

/// Client for the identity service of the hosted backend.
#[derive(Clone)]
pub struct GoTrueClient {
    http: Client,
    base_url: String,
    service_key: String,
}

impl GoTrueClient {
    /// Build a client with the configured per-call deadline.
    pub fn new(settings: &ResolvedCredentialStore) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| StoreError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            service_key: settings.service_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Query the service health endpoint.
    pub async fn health(&self) -> Result<HealthInfo, StoreError> {
        let response = send(
            self.http
                .get(self.endpoint("/health"))
                .header("apikey", &self.service_key),
        )
        .await?;
        read_json(response).await
    }

    /// Exchange email and password for a session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, StoreError> {
        let response = send(
            self.http
                .post(self.endpoint("/token"))
                .query(&[("grant_type", "password")])
                .header("apikey", &self.service_key)
                .json(&json!({ "email": email, "password": password })),
        )
        .await?;
        read_json(response).await
    }

    /// One page (1-based) of the admin user listing.
    pub async fn list_users(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<IdentityRecord>, StoreError> {
        let response = send(
            self.admin(self.http.get(self.endpoint("/admin/users")))
                .query(&[("page", page), ("per_page", per_page)]),
        )
        .await?;
        let page: UserPage = read_json(response).await?;
        Ok(page.users)
    }

    /// Scan the admin listing for a user with the given email
    /// (case-insensitive).
    ///
    /// Fails with [`StoreError::ListingTruncated`] rather than reporting the
    /// user as absent when the scan limit is reached before the last page.
    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        let wanted = email.trim().to_lowercase();
        for page in 1..=ADMIN_MAX_PAGES {
            let users = self.list_users(page, ADMIN_PAGE_SIZE).await?;
            let count = users.len();
            if let Some(found) = users.into_iter().find(|u| {
                u.email
                    .as_deref()
                    .is_some_and(|e| e.trim().to_lowercase() == wanted)
            }) {
                return Ok(Some(found));
            }
            if count < ADMIN_PAGE_SIZE as usize {
                return Ok(None);
            }
        }
        tracing::warn!(pages = ADMIN_MAX_PAGES, "user listing scan limit reached");
        Err(StoreError::ListingTruncated { pages: ADMIN_MAX_PAGES })
    }

    /// Set a new password for the given user.
    pub async fn update_user_password(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<IdentityRecord, StoreError> {
        let response = send(
            self.admin(self.http.put(self.endpoint(&format!("/admin/users/{user_id}"))))
                .json(&json!({ "password": password })),
        )
        .await?;
        read_json(response).await
    }
}

#[async_trait]
impl CredentialStore for GoTrueClient {
    async fn get_user(&self, access_token: &str) -> Result<IdentityRecord, StoreError> {
        let response = send(
            self.http
                .get(self.endpoint("/user"))
                .header("apikey", &self.service_key)
                .bearer_auth(access_token),
        )
        .await?;

        match response.status() {
            StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND
            | StatusCode::UNPROCESSABLE_ENTITY => Err(StoreError::Rejected {
                status: response.status().as_u16(),
            }),
            _ => read_json(response).await,
        }
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, StoreError> {
    builder.send().await.map_err(|e| {
        if e.is_timeout() {
            StoreError::Unavailable(format!("request timed out: {e}"))
        } else {
            StoreError::Unavailable(e.to_string())
        }
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    if status.is_server_error() {
        Err(StoreError::Unavailable(format!("HTTP {}: {message}", status.as_u16())))
    } else {
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull a human-readable message out of an identity service error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
