//! Configuration file model.

use crate::models::policy::PolicySection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub inventory: InventorySection,
    #[serde(default)]
    pub policy: PolicySection,
}

/// Where the collaborator feeds were written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventorySection {
    #[serde(default)]
    pub credentials: Option<PathBuf>,
    #[serde(default)]
    pub variables: Option<PathBuf>,
}
