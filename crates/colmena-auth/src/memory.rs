//! In-process credential store for tests and local development.

use crate::error::StoreError;
use crate::store::CredentialStore;
use async_trait::async_trait;
use colmena_core::IdentityRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed token table. Unknown tokens are rejected with HTTP 401 semantics.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, IdentityRecord>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as a credential for `identity`.
    pub fn with_user(mut self, token: impl Into<String>, identity: IdentityRecord) -> Self {
        self.users.insert(token.into(), identity);
        self
    }

    /// Make every lookup fail as if the store could not be reached.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get_user(&self, access_token: &str) -> Result<IdentityRecord, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        self.users
            .get(access_token)
            .cloned()
            .ok_or(StoreError::Rejected { status: 401 })
    }
}
