//! The authenticated identity attached to a request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Privilege level of a principal.
///
/// Ordered from the baseline level (`Family`) upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Family,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Family => "family",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role name is not one of `admin`, `teacher`, `family`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0:?}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "family" => Ok(Role::Family),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

/// Authenticated identity, resolved per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque user identifier issued by the credential store.
    pub id: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    /// Family this principal belongs to, for family accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
    /// Teacher profile linked to this principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this principal holds at least the given privilege level.
    pub fn has_role_at_least(&self, role: Role) -> bool {
        self.role >= role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("Teacher".parse::<Role>().unwrap(), Role::Teacher);
        assert_eq!(" ADMIN ".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("family".parse::<Role>().unwrap(), Role::Family);
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(err, ParseRoleError("superuser".to_string()));
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_ordering() {
        let principal = Principal {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            role: Role::Teacher,
            first_name: "Ana".to_string(),
            last_name: "Pérez".to_string(),
            family_id: None,
            teacher_id: Some("t-7".to_string()),
        };
        assert!(principal.has_role_at_least(Role::Family));
        assert!(principal.has_role_at_least(Role::Teacher));
        assert!(!principal.has_role_at_least(Role::Admin));
        assert!(!principal.is_admin());
    }

    #[test]
    fn test_principal_omits_absent_affiliations() {
        let principal = Principal {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            role: Role::Family,
            first_name: "Usuario".to_string(),
            last_name: "Colmena".to_string(),
            family_id: None,
            teacher_id: None,
        };
        let json = serde_json::to_value(&principal).unwrap();
        assert!(json.get("family_id").is_none());
        assert!(json.get("teacher_id").is_none());
        assert_eq!(json["role"], "family");
    }
}
