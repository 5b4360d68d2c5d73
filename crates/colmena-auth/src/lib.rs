//! # colmena-auth
//!
//! The authentication boundary of the La Colmena API.
//!
//! A request is authenticated in two steps:
//!
//! 1. [`TokenVerifier`] takes the bearer token from the `Authorization`
//!    header and asks the external [`CredentialStore`] whether it is valid,
//!    getting back an [`IdentityRecord`](colmena_core::IdentityRecord).
//! 2. [`IdentityEnricher`] turns that record into a
//!    [`Principal`](colmena_core::Principal), applying per-field defaults to
//!    the user metadata.
//!
//! [`Authenticator`] runs both steps. Nothing is cached between requests:
//! every call verifies against the store again.
//!
//! [`GoTrueClient`] is the production store, speaking the GoTrue HTTP API of
//! the hosted backend. [`memory::InMemoryCredentialStore`] is a fixed token
//! table for tests and local development.

pub mod authenticator;
pub mod enrichment;
pub mod error;
pub mod gotrue;
pub mod memory;
pub mod store;
pub mod verifier;

pub use authenticator::Authenticator;
pub use enrichment::IdentityEnricher;
pub use error::{AuthError, StoreError};
pub use gotrue::{GoTrueClient, HealthInfo, Session};
pub use store::CredentialStore;
pub use verifier::{TokenVerifier, bearer_token};
