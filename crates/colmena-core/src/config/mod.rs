//! Configuration types for the La Colmena API.
//!
//! Configuration is read from a single TOML file (`colmena.toml` by default)
//! once at process start and then passed by reference to every component.
//! Secrets are normally indirected through environment variables named in the
//! file rather than written into it.
//!
//! # Lookup order for the file
//!
//! 1. An explicit path (`--config`)
//! 2. The `COLMENA_CONFIG` environment variable
//! 3. `colmena.toml` in the working directory, if present
//! 4. Built-in defaults

pub mod credential_store;
pub mod identity;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use credential_store::{CredentialStoreConfig, ResolvedCredentialStore};
pub use identity::{IdentityConfig, MissingRolePolicy};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "COLMENA_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "colmena.toml";

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required setting is neither in the file nor in its environment variable.
    #[error("missing required setting `{setting}` (set it in the config file or via ${env})")]
    MissingSetting { setting: &'static str, env: String },

    /// A setting has a value that cannot be used.
    #[error("invalid setting `{setting}`: {reason}")]
    Invalid { setting: &'static str, reason: String },
}

/// Complete process configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColmenaConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// External identity service.
    #[serde(default)]
    pub credential_store: CredentialStoreConfig,

    /// How verified identities become principals.
    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ColmenaConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Load configuration following the documented lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path(explicit) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p));
        }
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:3001"
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Cross-origin headers attached to every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Origin`.
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,

    /// Whether to send `Access-Control-Allow-Credentials: true`.
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
}

fn default_allow_origin() -> String {
    "*".to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: default_allow_origin(),
            allow_credentials: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_true() -> bool {
    true
}
