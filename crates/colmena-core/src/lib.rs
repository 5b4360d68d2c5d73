//! # colmena-core
//!
//! Shared types for the La Colmena API:
//! - [`Principal`] and [`Role`]: the authenticated identity attached to a request
//! - [`IdentityRecord`] and [`UserMetadata`]: what the credential store returns
//!   for a verified token
//! - [`ColmenaConfig`]: process configuration, built once at startup

pub mod config;
pub mod identity;
pub mod principal;

pub use config::{
    ColmenaConfig, ConfigError, CorsConfig, CredentialStoreConfig, IdentityConfig,
    MissingRolePolicy, ObservabilityConfig, ResolvedCredentialStore, ServerConfig,
};
pub use identity::{IdentityRecord, UserMetadata};
pub use principal::{ParseRoleError, Principal, Role};
