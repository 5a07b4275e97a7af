//! Relative time rendering for operator output.

use chrono::{DateTime, Utc};

/// Render `at` relative to `now`, e.g. `3 days ago` or `2 hours from now`.
pub fn relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(at);
    let (secs, suffix) = if delta.num_seconds() >= 0 {
        (delta.num_seconds(), "ago")
    } else {
        (-delta.num_seconds(), "from now")
    };

    let (amount, unit) = match secs {
        0..=59 => return "now".to_string(),
        60..=3_599 => (secs / 60, "minute"),
        3_600..=86_399 => (secs / 3_600, "hour"),
        86_400..=2_591_999 => (secs / 86_400, "day"),
        2_592_000..=31_535_999 => (secs / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{} {}{} {}", amount, unit, plural, suffix)
}
