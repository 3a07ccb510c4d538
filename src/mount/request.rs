//! # Mount Request Parsing
//!
//! Decodes the attributes payload sent by the CSI driver into a validated
//! [`MountRequest`].
//!
//! The payload is a JSON object whose `secrets` field is itself a string holding a YAML
//! list, e.g.:
//!
//! ```json
//! {
//!   "csi.storage.k8s.io/pod.name": "app-0",
//!   "csi.storage.k8s.io/pod.namespace": "default",
//!   "vaultID": "1234",
//!   "secrets": "- name: db-password\n- vaultID: \"5678\"\n  name: api-key\n  path: config/api-key"
//! }
//! ```
//!
//! Decoding happens in two stages (JSON, then YAML) and fails fast. Validation of the
//! individual entries collects every violation before failing.

use super::error::{InvalidPath, MalformedInput, MountError, ValidationErrors, Violation};
use serde::{Deserialize, Deserializer};
use std::path::{Component, Path};

/// A validated mount request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountRequest {
    pub pod_name: String,
    pub pod_namespace: String,
    /// Default vault for entries without their own `vaultID`
    pub vault_id: String,
    pub secrets: Vec<SecretRef>,
}

/// Reference to one secret and where to place it in the volume
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretRef {
    pub vault_id: String,
    pub name: String,
    /// `None` selects the latest version
    pub version: Option<i64>,
    /// Relative mount path; empty means the secret name is used
    pub path: String,
}

impl SecretRef {
    /// Stable object identifier reported to the driver
    pub fn id(&self) -> String {
        let version = self
            .version
            .map_or_else(|| "latest".to_string(), |v| v.to_string());
        format!(
            "vaults/{}/secrets/{}/versions/{}",
            self.vault_id, self.name, version
        )
    }

    /// Path of the file relative to the mount target
    pub fn file_path(&self) -> &str {
        if self.path.is_empty() {
            &self.name
        } else {
            &self.path
        }
    }
}

/// Outer attributes object (first decoding stage)
#[derive(Debug, Deserialize)]
struct RawAttributes {
    #[serde(
        rename = "csi.storage.k8s.io/pod.name",
        default,
        deserialize_with = "string_or_null"
    )]
    pod_name: String,
    #[serde(
        rename = "csi.storage.k8s.io/pod.namespace",
        default,
        deserialize_with = "string_or_null"
    )]
    pod_namespace: String,
    #[serde(rename = "vaultID", default, deserialize_with = "string_or_null")]
    vault_id: String,
    #[serde(default, deserialize_with = "string_or_null")]
    secrets: String,
}

/// `null` is treated like an absent field
fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the `secrets` YAML list (second decoding stage)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSecret {
    #[serde(rename = "vaultID", deserialize_with = "scalar_string")]
    vault_id: String,
    #[serde(deserialize_with = "scalar_string")]
    name: String,
    version: Option<i64>,
    #[serde(deserialize_with = "scalar_string")]
    path: String,
}

/// Accept YAML scalars of any type as their string form (`vaultID: 5678`)
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar value, got {other:?}"
        ))),
    }
}

/// Parse and validate the attributes payload of a Mount call
pub fn parse_mount_request(attributes: &str) -> Result<MountRequest, MountError> {
    let raw: RawAttributes =
        serde_json::from_str(attributes).map_err(MalformedInput::Attributes)?;

    let entries: Vec<RawSecret> = if raw.secrets.trim().is_empty() {
        Vec::new()
    } else {
        serde_yaml::from_str::<Option<Vec<RawSecret>>>(&raw.secrets)
            .map_err(MalformedInput::Secrets)?
            .unwrap_or_default()
    };

    let mut violations = Vec::new();
    let mut secrets = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if is_blank(&entry.name) {
            violations.push(Violation::MissingField {
                index,
                field: "name",
            });
        }

        let vault_id = if !is_blank(&entry.vault_id) {
            entry.vault_id
        } else if !is_blank(&raw.vault_id) {
            raw.vault_id.clone()
        } else {
            violations.push(Violation::MissingField {
                index,
                field: "vaultID",
            });
            String::new()
        };

        if let Err(reason) = validate_path(&entry.path) {
            violations.push(Violation::InvalidPath { index, reason });
        } else if entry.path.is_empty() {
            // The name becomes the file path
            if let Err(reason) = validate_path(&entry.name) {
                violations.push(Violation::InvalidName { index, reason });
            }
        }

        secrets.push(SecretRef {
            vault_id,
            name: entry.name,
            version: entry.version,
            path: entry.path,
        });
    }

    if let Some(errors) = ValidationErrors::from_violations(violations) {
        return Err(errors.into());
    }

    Ok(MountRequest {
        pod_name: raw.pod_name,
        pod_namespace: raw.pod_namespace,
        vault_id: raw.vault_id,
        secrets,
    })
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check that `path` stays inside the mount directory
///
/// An empty path is valid (the secret name is used instead).
pub fn validate_path(path: &str) -> Result<(), InvalidPath> {
    if path.is_empty() {
        return Ok(());
    }

    let path = Path::new(path);
    if path.is_absolute() || path.has_root() {
        return Err(InvalidPath::Absolute);
    }

    // Any `..` component, not only a leading one
    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(InvalidPath::ParentEscape);
    }

    Ok(())
}
