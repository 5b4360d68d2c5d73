//! Identity records as returned by the credential store.
//!
//! The store keeps per-user metadata as free-form JSON. Only the keys this
//! system reads are modelled here; each one is optional and accepts either a
//! string or a number. Anything else (objects, arrays, booleans, `null`) reads
//! as absent so that one odd metadata value never fails the whole record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw identity resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub user_metadata: UserMetadata,
}

/// The metadata keys consulted during identity enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
}

impl UserMetadata {
    /// Returns the value only if it contains something other than whitespace.
    pub fn non_blank(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_metadata<'de, D>(deserializer: D) -> Result<UserMetadata, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(v @ Value::Object(_)) => UserMetadata::deserialize(v).map_err(serde::de::Error::custom),
        _ => Ok(UserMetadata::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parses_store_user_payload() {
        let payload = json!({
            "id": "u1",
            "aud": "authenticated",
            "email": "a@x.com",
            "app_metadata": { "provider": "email" },
            "user_metadata": {
                "role": "teacher",
                "first_name": "Ana",
                "avatar": { "url": "ignored" }
            },
            "created_at": "2024-03-01T10:00:00Z"
        });

        let record: IdentityRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(
            record,
            IdentityRecord {
                id: "u1".to_string(),
                email: Some("a@x.com".to_string()),
                user_metadata: UserMetadata {
                    role: Some("teacher".to_string()),
                    first_name: Some("Ana".to_string()),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn test_numeric_affiliations_become_strings() {
        let record: IdentityRecord = serde_json::from_value(json!({
            "id": "u2",
            "email": "fam@x.com",
            "user_metadata": { "family_id": 42, "teacher_id": null, "last_name": true }
        }))
        .unwrap();

        assert_eq!(record.user_metadata.family_id.as_deref(), Some("42"));
        assert_eq!(record.user_metadata.teacher_id, None);
        assert_eq!(record.user_metadata.last_name, None);
    }

    #[test]
    fn test_missing_or_null_metadata_is_empty() {
        let record: IdentityRecord = serde_json::from_value(json!({ "id": "u3" })).unwrap();
        assert_eq!(record.email, None);
        assert_eq!(record.user_metadata, UserMetadata::default());

        let record: IdentityRecord =
            serde_json::from_value(json!({ "id": "u4", "user_metadata": null })).unwrap();
        assert_eq!(record.user_metadata, UserMetadata::default());

        let record: IdentityRecord =
            serde_json::from_value(json!({ "id": "u5", "user_metadata": "oops" })).unwrap();
        assert_eq!(record.user_metadata, UserMetadata::default());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(UserMetadata::non_blank(&Some("  Ana ".to_string())), Some("Ana"));
        assert_eq!(UserMetadata::non_blank(&Some("   ".to_string())), None);
        assert_eq!(UserMetadata::non_blank(&None), None);
    }
}
