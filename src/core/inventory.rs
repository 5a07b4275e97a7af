//! Reads the feeds produced by the credential-store and deployment
//! collaborators.

use crate::models::credential::CredentialRecord;
use crate::models::variable::Variable;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Both feeds of one synchronization pass.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub credentials: Vec<CredentialRecord>,
    pub variables: Vec<Variable>,
}

impl Inventory {
    /// Load the feeds. An absent variables feed means no deployments.
    pub fn load(credentials: &Path, variables: Option<&Path>) -> Result<Self> {
        let credentials: Vec<CredentialRecord> = read_feed(credentials, "credentials")?;
        let variables: Vec<Variable> = match variables {
            Some(path) => read_feed(path, "variables")?,
            None => Vec::new(),
        };
        debug!(
            credentials = credentials.len(),
            variables = variables.len(),
            "inventory loaded"
        );
        Ok(Self { credentials, variables })
    }
}

fn read_feed<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read {} feed {}", kind, path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {} feed {}", kind, path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::credential::CredentialType;
    use crate::models::variable::UpdateMode;

    const CREDENTIALS: &str = r#"[
        {"id": "c1", "name": "/cf/ca", "type": "certificate", "version_created_at": "2024-01-01T00:00:00Z",
         "certificate": {"expiry_date": "2025-01-01T00:00:00Z", "certificate_authority": true,
                         "subject_key_id": "k1", "signing": true}},
        {"id": "p1", "name": "/cf/admin", "type": "password", "version_created_at": "2024-02-01T00:00:00Z"}
    ]"#;

    const VARIABLES: &str = r#"[
        {"id": "p1", "name": "/cf/admin", "deployment": "cf",
         "definition": {"name": "admin", "type": "password", "update_mode": "no-overwrite"}},
        {"name": "/cf/ca", "deployment": "cf"}
    ]"#;

    #[test]
    fn test_load_both_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let creds = dir.path().join("credentials.json");
        let vars = dir.path().join("variables.json");
        fs::write(&creds, CREDENTIALS).unwrap();
        fs::write(&vars, VARIABLES).unwrap();

        let inventory = Inventory::load(&creds, Some(&vars)).unwrap();
        assert_eq!(inventory.credentials.len(), 2);
        assert_eq!(inventory.credentials[0].credential_type, CredentialType::Certificate);
        assert_eq!(
            inventory.credentials[0].certificate.as_ref().unwrap().signing,
            Some(true)
        );
        assert_eq!(inventory.variables.len(), 2);
        assert_eq!(
            inventory.variables[0].definition.as_ref().unwrap().update_mode,
            UpdateMode::NoOverwrite
        );
        assert!(inventory.variables[1].id.is_empty());
    }

    #[test]
    fn test_variables_feed_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let creds = dir.path().join("credentials.json");
        fs::write(&creds, CREDENTIALS).unwrap();
        let inventory = Inventory::load(&creds, None).unwrap();
        assert!(inventory.variables.is_empty());
    }

    #[test]
    fn test_malformed_feed_names_kind() {
        let dir = tempfile::tempdir().unwrap();
        let creds = dir.path().join("credentials.json");
        fs::write(&creds, r#"[{"id": "x"}]"#).unwrap();
        let err = Inventory::load(&creds, None).unwrap_err();
        assert!(format!("{:#}", err).contains("parse credentials feed"));
    }

    #[test]
    fn test_missing_feed() {
        let dir = tempfile::tempdir().unwrap();
        let err = Inventory::load(&dir.path().join("nope.json"), None).unwrap_err();
        assert!(format!("{:#}", err).contains("read credentials feed"));
    }
}
