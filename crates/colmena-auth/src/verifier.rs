//! Bearer token verification against the credential store.

use crate::error::AuthError;
use crate::store::CredentialStore;
use colmena_core::IdentityRecord;
use std::sync::Arc;

/// Extract the token from an `Authorization` header value.
///
/// Only the `Bearer` scheme is accepted (case-insensitive). Anything else,
/// including an empty token, counts as no token at all.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let (scheme, rest) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

/// Confirms a bearer token with the credential store.
#[derive(Clone)]
pub struct TokenVerifier {
    store: Arc<dyn CredentialStore>,
}

impl TokenVerifier {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Verify `token` and return the identity it belongs to.
    ///
    /// An absent token fails without contacting the store. A present token
    /// costs exactly one store call; there is no retry.
    pub async fn verify(&self, token: Option<&str>) -> Result<IdentityRecord, AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;

        match self.store.get_user(token).await {
            Ok(identity) => {
                tracing::debug!(user_id = %identity.id, "bearer token verified");
                Ok(identity)
            }
            Err(err) if err.rejects_token() => {
                tracing::warn!(error = %err, "bearer token rejected");
                Err(err.into())
            }
            Err(err) => {
                tracing::error!(error = %err, "credential store call failed");
                Err(err.into())
            }
        }
    }
}
