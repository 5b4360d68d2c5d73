//! The credential store seam.

use crate::error::StoreError;
use async_trait::async_trait;
use colmena_core::IdentityRecord;

/// External service that issues and validates bearer tokens.
///
/// Implementations must not cache: each call asks the store whether the token
/// is valid right now.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve `access_token` to the identity it was issued for.
    ///
    /// Returns [`StoreError::Rejected`] when the store does not accept the
    /// token, and an upstream error when the store could not be asked.
    async fn get_user(&self, access_token: &str) -> Result<IdentityRecord, StoreError>;
}
