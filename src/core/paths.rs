//! Configuration file discovery.

use crate::constants;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Where the configuration came from, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Flag,
    Env,
    Discovered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub source: ConfigSource,
}

impl ConfigPath {
    /// Resolve from CLI arg, env var, or the nearest ancestor holding a
    /// config file. `None` means run on defaults.
    pub fn resolve(config_arg: Option<PathBuf>) -> Result<Option<Self>> {
        if let Some(path) = config_arg {
            return Ok(Some(Self { path, source: ConfigSource::Flag }));
        }
        if let Some(path) = env::var_os(constants::CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Ok(Some(Self {
                path: PathBuf::from(path),
                source: ConfigSource::Env,
            }));
        }
        let cwd = env::current_dir().context("resolve current directory")?;
        Ok(discover(&cwd).map(|path| Self {
            path,
            source: ConfigSource::Discovered,
        }))
    }
}

fn discover(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(constants::CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

impl std::fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.source {
            ConfigSource::Flag => "--config",
            ConfigSource::Env => constants::CONFIG_ENV,
            ConfigSource::Discovered => "discovered",
        };
        write!(f, "{} ({})", self.path.display(), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_flag_wins() {
        let resolved = ConfigPath::resolve(Some(PathBuf::from("/etc/rotary.toml")))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/etc/rotary.toml"));
        assert_eq!(resolved.source, ConfigSource::Flag);
    }

    #[test]
    fn test_discover_nearest_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("a").join(constants::CONFIG_FILE_NAME), "").unwrap();

        assert_eq!(discover(&nested), Some(dir.path().join("a").join(constants::CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_discover_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(constants::CONFIG_FILE_NAME)).unwrap();
        let found = discover(dir.path());
        assert_ne!(found, Some(dir.path().join(constants::CONFIG_FILE_NAME)));
    }
}
