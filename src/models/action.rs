//! Lifecycle actions recommended for a credential version.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    None,
    NoOverwrite,
    BoshDeploy,
    Regenerate,
    CleanUp,
    MarkTransitional,
    #[serde(rename = "unmark-transitional")]
    UnMarkTransitional,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::None => "none",
            Action::NoOverwrite => "no-overwrite",
            Action::BoshDeploy => "bosh-deploy",
            Action::Regenerate => "regenerate",
            Action::CleanUp => "clean-up",
            Action::MarkTransitional => "mark-transitional",
            Action::UnMarkTransitional => "unmark-transitional",
        }
    }

    /// Whether anything has to happen for this credential.
    pub fn is_pending(&self) -> bool {
        !matches!(self, Action::None | Action::NoOverwrite)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
