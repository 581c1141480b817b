//! Compact rendering of engagement counters and article ages.

use chrono::{DateTime, Utc};

use crate::core::filter::parse_published;

/// Formats a counter for display:
///
/// - below 1 000: as is (`888`)
/// - below 1 000 000: thousands with a `k` suffix (`90.9k`, `1k`)
/// - otherwise: millions with an `m` suffix (`9.5m`, `2m`)
///
/// One decimal place is shown unless the value is whole.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        count.to_string()
    } else if count < 1_000_000 {
        with_suffix(count as f64 / 1_000.0, 'k')
    } else {
        with_suffix(count as f64 / 1_000_000.0, 'm')
    }
}

fn with_suffix(value: f64, suffix: char) -> String {
    if value.fract() == 0.0 {
        format!("{value}{suffix}")
    } else {
        format!("{value:.1}{suffix}")
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = MINUTE * 60;
const DAY: i64 = HOUR * 24;
const WEEK: i64 = DAY * 7;

/// Renders how long ago `published` was, relative to `now`: `just now`,
/// `5m ago`, `3h ago`, `2d ago`, `1w ago`. Units are floored.
///
/// Returns `None` when the timestamp cannot be parsed. Future timestamps
/// render as `just now`.
pub fn format_relative_time(published: &str, now: DateTime<Utc>) -> Option<String> {
    let elapsed = (now - parse_published(published)?).num_seconds();
    let label = if elapsed < MINUTE {
        "just now".to_string()
    } else if elapsed < HOUR {
        format!("{}m ago", elapsed / MINUTE)
    } else if elapsed < DAY {
        format!("{}h ago", elapsed / HOUR)
    } else if elapsed < WEEK {
        format!("{}d ago", elapsed / DAY)
    } else {
        format!("{}w ago", elapsed / WEEK)
    };
    Some(label)
}
