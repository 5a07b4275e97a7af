//! Centralized names for files and environment variables.

/// Configuration file searched for in the working directory's ancestors.
pub const CONFIG_FILE_NAME: &str = "rotary.toml";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "ROTARY_CONFIG";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";
