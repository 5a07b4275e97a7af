//! Rotation policy section of the configuration file.

use crate::models::criteria::RegenerationCriteria;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySection {
    /// Regenerate values older than this (e.g. "90d").
    #[serde(default, with = "humantime_serde")]
    pub older_than: Option<Duration>,

    /// Regenerate certificates expiring within this window (e.g. "30d").
    #[serde(default, with = "humantime_serde")]
    pub expires_within: Option<Duration>,

    /// Rotate paths even when their variable definition says no-overwrite.
    #[serde(default)]
    pub ignore_update_mode: bool,
}

impl PolicySection {
    /// Resolve relative thresholds against `now`.
    pub fn criteria(&self, now: DateTime<Utc>) -> Result<RegenerationCriteria> {
        let mut criteria = RegenerationCriteria::default().ignore_update_mode(self.ignore_update_mode);
        if let Some(age) = self.older_than {
            let at = chrono::Duration::from_std(age)
                .ok()
                .and_then(|age| now.checked_sub_signed(age))
                .context("policy.older_than out of range")?;
            criteria = criteria.older_than(at);
        }
        if let Some(window) = self.expires_within {
            let at = chrono::Duration::from_std(window)
                .ok()
                .and_then(|window| now.checked_add_signed(window))
                .context("policy.expires_within out of range")?;
            criteria = criteria.expires_before(at);
        }
        Ok(criteria)
    }
}
