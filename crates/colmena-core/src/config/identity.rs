//! Identity enrichment policy.

use crate::principal::Role;
use serde::{Deserialize, Serialize};

/// What to do when a verified identity carries no usable role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingRolePolicy {
    /// Substitute [`IdentityConfig::default_role`].
    #[default]
    Default,
    /// Refuse the request.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub missing_role: MissingRolePolicy,

    /// Role granted under [`MissingRolePolicy::Default`].
    #[serde(default)]
    pub default_role: Role,

    /// Placeholder first name for identities without one.
    #[serde(default = "default_first_name")]
    pub default_first_name: String,

    /// Placeholder last name for identities without one.
    #[serde(default = "default_last_name")]
    pub default_last_name: String,
}

fn default_first_name() -> String {
    "Usuario".to_string()
}

fn default_last_name() -> String {
    "Colmena".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            missing_role: MissingRolePolicy::default(),
            default_role: Role::default(),
            default_first_name: default_first_name(),
            default_last_name: default_last_name(),
        }
    }
}
