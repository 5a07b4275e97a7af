//! CLI routing and command dispatch.

use crate::constants;
use crate::core::inventory::Inventory;
use crate::core::paths::ConfigPath;
use crate::core::settings;
use crate::models::config::ConfigFile;
use crate::state::{FilterConfig, Store};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub mod describe;
pub mod list;
pub mod plan;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub config: ConfigFile,
    pub credentials: Option<PathBuf>,
    pub variables: Option<PathBuf>,
    /// Captured once so every threshold in one invocation agrees.
    pub now: DateTime<Utc>,
}

impl CliContext {
    /// Read both feeds and build the state graph.
    pub fn load_store(&self) -> Result<Store> {
        let credentials = self.credentials.as_deref().context(
            "no credentials feed: pass --credentials or set [inventory] credentials in rotary.toml",
        )?;
        if self.variables.is_none() {
            warn!("no variables feed configured, treating every credential as undeployed");
        }
        let inventory = Inventory::load(credentials, self.variables.as_deref())?;

        let store = Store::new();
        store
            .update(inventory.credentials, inventory.variables)
            .context("build credential state")?;
        Ok(store)
    }
}

#[derive(Parser, Debug)]
#[command(name = "rotary", version, about = "Plan rotation of credential-store secrets")]
pub struct Cli {
    /// Configuration file (default: $ROTARY_CONFIG, then nearest rotary.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Credential inventory feed (JSON)
    #[arg(long, global = true, value_name = "PATH", env = "ROTARY_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Deployment variables feed (JSON)
    #[arg(long, global = true, value_name = "PATH", env = "ROTARY_VARIABLES")]
    pub variables: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose);

        let config_path = ConfigPath::resolve(self.config)?;
        let config = match &config_path {
            Some(found) => {
                debug!(config = %found, "loading configuration");
                settings::load(&found.path)?
            }
            None => ConfigFile::default(),
        };

        let ctx = CliContext {
            credentials: self.credentials.or_else(|| config.inventory.credentials.clone()),
            variables: self.variables.or_else(|| config.inventory.variables.clone()),
            config,
            now: Utc::now(),
        };

        match self.command {
            Commands::List(args) => list::run(&ctx, args),
            Commands::Plan(args) => plan::run(&ctx, args),
            Commands::Describe(args) => describe::run(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List credential versions
    List(list::ListArgs),
    /// Show the next action for each credential version (read-only)
    Plan(plan::PlanArgs),
    /// Describe a path or a single credential version
    Describe(describe::DescribeArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Query flags shared by commands that select credentials.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Only these credential types (comma separated)
    #[arg(short, long, value_delimiter = ',', value_name = "TYPE")]
    pub types: Vec<String>,

    /// Only paths referenced by these deployments (comma separated)
    #[arg(short, long, value_delimiter = ',', value_name = "NAME")]
    pub deployments: Vec<String>,

    /// Only certificates expiring within this window (e.g. 30d)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub expires_within: Option<Duration>,
}

impl SelectionArgs {
    pub fn filter_config(&self, now: DateTime<Utc>) -> Result<FilterConfig> {
        let expires_before = self
            .expires_within
            .map(|window| now.checked_add_signed(window).context("--expires-within out of range"))
            .transpose()?;
        let config = FilterConfig::new(&self.types, self.deployments.clone(), expires_before)?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(constants::DEFAULT_LOG_FILTER)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // a second init (tests, embedding) keeps the first subscriber
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

/// Clap parser for humantime durations such as `90d`, `2w` or `12h`.
pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
    let parsed = humantime::parse_duration(s).map_err(|e| format!("invalid duration '{}': {}", s, e))?;
    Duration::from_std(parsed).map_err(|_| format!("duration '{}' is out of range", s))
}

/// Placeholder for empty table cells.
pub(crate) fn or_dash(value: impl Into<String>) -> String {
    let value = value.into();
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}
