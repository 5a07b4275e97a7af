//! Rotation planner for credential-store secrets.
//!
//! Builds a graph of credential versions, the paths that own them and the
//! deployments that consume them, then decides the single next lifecycle
//! action for each version. Nothing here performs the action itself.
//!
//! ## Modules
//! - `state`: Credential graph, filter/collector algebra, decision engine
//! - `models`: Feed records, policy and configuration data
//! - `core`: Configuration and inventory loading
//! - `cli`: Command-line handlers
//! - `util`: Duration parsing and relative time

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod state;
pub mod util;
