//! Operator policy for regeneration decisions.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Thresholds a credential is measured against. An absent threshold
/// disables the rule that uses it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegenerationCriteria {
    /// Regenerate latest versions created before this instant.
    pub older_than: Option<DateTime<Utc>>,
    /// Regenerate certificates expiring before this instant.
    pub expires_before: Option<DateTime<Utc>>,
    /// Treat `no-overwrite` paths like any other path.
    pub ignore_update_mode: bool,
}

impl RegenerationCriteria {
    pub fn older_than(mut self, at: DateTime<Utc>) -> Self {
        self.older_than = Some(at);
        self
    }

    pub fn expires_before(mut self, at: DateTime<Utc>) -> Self {
        self.expires_before = Some(at);
        self
    }

    pub fn ignore_update_mode(mut self, ignore: bool) -> Self {
        self.ignore_update_mode = ignore;
        self
    }
}
