use crate::models::config::ConfigFile;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load the configuration file. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let mut config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;

    // inventory paths are relative to the file that names them
    if let Some(dir) = path.parent() {
        let inventory = &mut config.inventory;
        for feed in [&mut inventory.credentials, &mut inventory.variables] {
            if let Some(p) = feed.as_mut() {
                if p.is_relative() {
                    *p = dir.join(&*p);
                }
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("rotary.toml")).unwrap();
        assert!(config.inventory.credentials.is_none());
        assert!(config.policy.older_than.is_none());
        assert!(!config.policy.ignore_update_mode);
    }

    #[test]
    fn test_load_resolves_inventory_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotary.toml");
        fs::write(
            &path,
            r#"
[inventory]
credentials = "feeds/credentials.json"
variables = "/var/lib/rotary/variables.json"

[policy]
older_than = "90d"
expires_within = "30d"
"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.inventory.credentials, Some(dir.path().join("feeds/credentials.json")));
        assert_eq!(config.inventory.variables, Some(PathBuf::from("/var/lib/rotary/variables.json")));
        assert_eq!(config.policy.older_than, Some(Duration::from_secs(90 * 86400)));
        assert_eq!(config.policy.expires_within, Some(Duration::from_secs(30 * 86400)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotary.toml");
        fs::write(&path, "[policy\nolder_than = ").unwrap();
        let err = load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }

    #[test]
    fn test_negative_policy_duration_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotary.toml");
        fs::write(&path, "[policy]\nolder_than = \"-5d\"\n").unwrap();
        let err = load(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("parse config"));
        assert!(message.contains("older_than"));
    }
}
