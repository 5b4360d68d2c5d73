//! Shared application state.

use crate::middleware::cors::CorsHeaders;
use anyhow::Context;
use colmena_auth::{Authenticator, CredentialStore, GoTrueClient};
use colmena_core::{ColmenaConfig, IdentityConfig};
use std::sync::Arc;

/// Immutable after startup; cloned into every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    authenticator: Authenticator,
    cors: CorsHeaders,
}

impl AppState {
    pub fn new(authenticator: Authenticator, cors: CorsHeaders) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                authenticator,
                cors,
            }),
        }
    }

    /// State backed by an arbitrary credential store, with default CORS headers.
    pub fn with_store(store: Arc<dyn CredentialStore>, identity: IdentityConfig) -> Self {
        Self::new(Authenticator::new(store, identity), CorsHeaders::default())
    }

    /// Build the production state: resolve the credential store settings and
    /// connect the GoTrue client.
    pub fn from_config(config: &ColmenaConfig) -> anyhow::Result<Self> {
        let settings = config
            .credential_store
            .resolve()
            .context("credential store is not configured")?;
        let client = GoTrueClient::new(&settings)?;
        tracing::info!(base_url = %client.base_url(), "using credential store");

        let cors = CorsHeaders::from_config(&config.cors)?;
        let authenticator = Authenticator::new(Arc::new(client), config.identity.clone());
        Ok(Self::new(authenticator, cors))
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.authenticator
    }

    pub fn cors(&self) -> &CorsHeaders {
        &self.inner.cors
    }
}
