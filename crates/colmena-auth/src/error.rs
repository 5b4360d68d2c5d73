//! Error types for the auth crate.

use thiserror::Error;

/// Failures talking to the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the presented token.
    #[error("credential store rejected the token (HTTP {status})")]
    Rejected { status: u16 },

    /// The store answered with an error for a non-token reason.
    #[error("credential store error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Network failure, timeout, or a 5xx from the store.
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    /// The store answered 2xx with a body we could not decode.
    #[error("unexpected credential store response: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build credential store client: {0}")]
    Client(String),

    /// The admin user listing still had full pages when the scan limit was hit.
    #[error("user listing not exhausted after {pages} pages")]
    ListingTruncated { pages: u32 },
}

impl StoreError {
    /// Whether this error reflects a fault of the store itself rather than of
    /// the request.
    pub fn is_upstream_fault(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::Decode(_) | StoreError::Client(_)
        )
    }

    /// Whether the store refused the token itself. Every other error surfaces
    /// to callers as an upstream failure.
    pub fn rejects_token(&self) -> bool {
        matches!(self, StoreError::Rejected { .. })
    }
}

/// Reasons a request fails authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token was presented.
    #[error("no bearer token provided")]
    MissingToken,

    /// The credential store does not accept the token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The identity has no usable role and the policy refuses to default one.
    #[error("identity has no assigned role")]
    RoleNotAssigned,

    /// The credential store call itself failed.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl AuthError {
    /// Message returned to HTTP clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Token no proporcionado",
            AuthError::InvalidToken => "Token inválido",
            AuthError::RoleNotAssigned => "Rol no asignado",
            AuthError::Upstream(_) => "Servicio de autenticación no disponible",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        if err.rejects_token() {
            AuthError::InvalidToken
        } else {
            AuthError::Upstream(err.to_string())
        }
    }
}
