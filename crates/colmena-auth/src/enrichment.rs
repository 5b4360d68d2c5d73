//! Turning a verified identity into a [`Principal`].
//!
//! Each metadata field is defaulted on its own; a record with a first name
//! but no last name keeps the first name and gets the placeholder last name.
//! Blank values count as absent.

use crate::error::AuthError;
use colmena_core::{IdentityConfig, IdentityRecord, MissingRolePolicy, Principal, Role, UserMetadata};

#[derive(Debug, Clone, Default)]
pub struct IdentityEnricher {
    config: IdentityConfig,
}

impl IdentityEnricher {
    pub fn new(config: IdentityConfig) -> Self {
        Self { config }
    }

    pub fn enrich(&self, identity: IdentityRecord) -> Result<Principal, AuthError> {
        let meta = &identity.user_metadata;
        let role = self.resolve_role(&identity.id, meta)?;

        let first_name = UserMetadata::non_blank(&meta.first_name)
            .unwrap_or(self.config.default_first_name.as_str())
            .to_string();
        let last_name = UserMetadata::non_blank(&meta.last_name)
            .unwrap_or(self.config.default_last_name.as_str())
            .to_string();
        let family_id = UserMetadata::non_blank(&meta.family_id).map(str::to_string);
        let teacher_id = UserMetadata::non_blank(&meta.teacher_id).map(str::to_string);

        Ok(Principal {
            id: identity.id,
            email: identity.email.unwrap_or_default(),
            role,
            first_name,
            last_name,
            family_id,
            teacher_id,
        })
    }

    fn resolve_role(&self, user_id: &str, meta: &UserMetadata) -> Result<Role, AuthError> {
        let raw = UserMetadata::non_blank(&meta.role);
        if let Some(role) = raw.and_then(|r| r.parse::<Role>().ok()) {
            return Ok(role);
        }

        match self.config.missing_role {
            MissingRolePolicy::Default => {
                tracing::debug!(
                    user_id,
                    metadata_role = raw.unwrap_or(""),
                    default_role = %self.config.default_role,
                    "no usable role in metadata, applying default"
                );
                Ok(self.config.default_role)
            }
            MissingRolePolicy::Reject => {
                tracing::warn!(
                    user_id,
                    metadata_role = raw.unwrap_or(""),
                    "no usable role in metadata, refusing"
                );
                Err(AuthError::RoleNotAssigned)
            }
        }
    }
}
