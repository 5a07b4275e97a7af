//! Deployment-manifest variable definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a deployment treats an existing value when it is redeployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateMode {
    #[default]
    Converge,
    NoOverwrite,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Converge => f.write_str("converge"),
            UpdateMode::NoOverwrite => f.write_str("no-overwrite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,
    #[serde(default)]
    pub update_mode: UpdateMode,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, serde_json::Value>,
}

/// A credential version in use by one deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Credential version id; empty when the deployment never resolved it.
    #[serde(default)]
    pub id: String,
    /// Credential-store path name.
    pub name: String,
    pub deployment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<VariableDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_mode_defaults_to_converge() {
        let def: VariableDefinition = serde_json::from_str(r#"{"name": "admin_password"}"#).unwrap();
        assert_eq!(def.update_mode, UpdateMode::Converge);
    }

    #[test]
    fn test_update_mode_kebab_case() {
        let def: VariableDefinition =
            serde_json::from_str(r#"{"name": "ca", "type": "certificate", "update_mode": "no-overwrite"}"#)
                .unwrap();
        assert_eq!(def.update_mode, UpdateMode::NoOverwrite);
        assert_eq!(def.variable_type.as_deref(), Some("certificate"));
        assert_eq!(UpdateMode::NoOverwrite.to_string(), "no-overwrite");
    }

    #[test]
    fn test_variable_without_id() {
        let var: Variable =
            serde_json::from_str(r#"{"name": "/bosh/cf/ca", "deployment": "cf"}"#).unwrap();
        assert!(var.id.is_empty());
        assert!(var.definition.is_none());
    }
}
