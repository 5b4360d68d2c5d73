//! Verification and enrichment in one call.

use crate::enrichment::IdentityEnricher;
use crate::error::AuthError;
use crate::store::CredentialStore;
use crate::verifier::{TokenVerifier, bearer_token};
use colmena_core::{IdentityConfig, Principal};
use std::sync::Arc;

/// Resolves an `Authorization` header to a [`Principal`].
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct Authenticator {
    verifier: TokenVerifier,
    enricher: Arc<IdentityEnricher>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, identity: IdentityConfig) -> Self {
        Self {
            verifier: TokenVerifier::new(store),
            enricher: Arc::new(IdentityEnricher::new(identity)),
        }
    }

    /// Authenticate from the raw `Authorization` header value.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        self.authenticate_token(bearer_token(authorization)).await
    }

    /// Authenticate an already extracted bearer token.
    pub async fn authenticate_token(&self, token: Option<&str>) -> Result<Principal, AuthError> {
        let identity = self.verifier.verify(token).await?;
        self.enricher.enrich(identity)
    }
}
