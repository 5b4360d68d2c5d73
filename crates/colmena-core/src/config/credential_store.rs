//! Credential store (identity service) connection settings.
//!
//! Both the base URL and the privileged service key are required. Each can be
//! given literally or through an environment variable; the environment
//! variable takes precedence when set.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the external credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialStoreConfig {
    /// Environment variable holding the base URL.
    #[serde(default = "default_url_env")]
    pub url_env: String,

    /// Base URL, e.g. "https://xyz.supabase.co".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Environment variable holding the service key.
    #[serde(default = "default_service_key_env")]
    pub service_key_env: String,

    /// Privileged service key. Prefer `service_key_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_key: Option<String>,

    /// Deadline for each call to the store, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url_env() -> String {
    "SUPABASE_URL".to_string()
}

fn default_service_key_env() -> String {
    "SUPABASE_SERVICE_ROLE_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for CredentialStoreConfig {
    fn default() -> Self {
        Self {
            url_env: default_url_env(),
            url: None,
            service_key_env: default_service_key_env(),
            service_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Fully resolved store settings, ready to build a client from.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredentialStore {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub service_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ResolvedCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredentialStore")
            .field("base_url", &self.base_url)
            .field("service_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CredentialStoreConfig {
    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<ResolvedCredentialStore, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` to read environment variables.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedCredentialStore, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = pick(lookup(&self.url_env), self.url.as_deref()).ok_or_else(|| {
            ConfigError::MissingSetting {
                setting: "credential_store.url",
                env: self.url_env.clone(),
            }
        })?;
        let service_key = pick(lookup(&self.service_key_env), self.service_key.as_deref())
            .ok_or_else(|| ConfigError::MissingSetting {
                setting: "credential_store.service_key",
                env: self.service_key_env.clone(),
            })?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                setting: "credential_store.url",
                reason: format!("expected an http(s) URL, got {url:?}"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                setting: "credential_store.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(ResolvedCredentialStore {
            base_url: url.trim_end_matches('/').to_string(),
            service_key,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn pick(from_env: Option<String>, literal: Option<&str>) -> Option<String> {
    from_env
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            literal
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}
