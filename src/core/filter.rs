//! # News Filter Engine
//!
//! Derives the visible feed from `(items, selected categories, time window)`.
//! Nothing here holds state between calls: the selection lives in
//! [`FilterState`], owned by whoever renders the list, and every operation
//! hands back a new value instead of mutating in place.
//!
//! ```text
//! items ──▶ category pass ──▶ time-window pass ──▶ filtered items
//!              (cheap)          (parses dates)
//! ```
//!
//! Two quirks are preserved on purpose:
//!
//! - An empty selection and a full selection both mean "show everything".
//!   They look different in the picker but filter identically.
//! - An item whose `published` timestamp cannot be parsed is never hidden
//!   by the time window.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::core::category::Category;
use crate::feed::NewsItem;

// ============================================================================
// Time Window
// ============================================================================

/// Recency filter applied to the `published` timestamp.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "all", alias = "forever")]
    All,
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "48h")]
    Hours48,
    #[serde(rename = "96h")]
    Hours96,
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "14d")]
    Days14,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 6] = [
        TimeWindow::All,
        TimeWindow::Today,
        TimeWindow::Hours48,
        TimeWindow::Hours96,
        TimeWindow::Days7,
        TimeWindow::Days14,
    ];

    /// Width of the window, or `None` for no cutoff.
    pub fn span(self) -> Option<Duration> {
        match self {
            TimeWindow::All => None,
            TimeWindow::Today => Some(Duration::hours(24)),
            TimeWindow::Hours48 => Some(Duration::hours(48)),
            TimeWindow::Hours96 => Some(Duration::hours(96)),
            TimeWindow::Days7 => Some(Duration::days(7)),
            TimeWindow::Days14 => Some(Duration::days(14)),
        }
    }

    /// Oldest instant still inside the window.
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.span().map(|span| now - span)
    }

    pub fn code(self) -> &'static str {
        match self {
            TimeWindow::All => "all",
            TimeWindow::Today => "today",
            TimeWindow::Hours48 => "48h",
            TimeWindow::Hours96 => "96h",
            TimeWindow::Days7 => "7d",
            TimeWindow::Days14 => "14d",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TimeWindow::All => "All Time",
            TimeWindow::Today => "Today",
            TimeWindow::Hours48 => "Last 48 Hours",
            TimeWindow::Hours96 => "Last 96 Hours",
            TimeWindow::Days7 => "Last 7 Days",
            TimeWindow::Days14 => "Last 14 Days",
        }
    }

    /// True when the window actually narrows the feed (the "sort" badge).
    pub fn is_active(self) -> bool {
        self != TimeWindow::All
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeWindowError(pub String);

impl fmt::Display for ParseTimeWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown time window: {} (expected one of all, today, 48h, 96h, 7d, 14d)",
            self.0
        )
    }
}

impl std::error::Error for ParseTimeWindowError {}

impl FromStr for TimeWindow {
    type Err = ParseTimeWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "forever" {
            return Ok(TimeWindow::All);
        }
        TimeWindow::ALL
            .into_iter()
            .find(|w| w.code() == lower)
            .ok_or_else(|| ParseTimeWindowError(s.to_string()))
    }
}

// ============================================================================
// Category Selection
// ============================================================================

/// A set of selected categories.
///
/// Empty means "none selected", the full catalog means "all selected".
/// Both disable category filtering.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<Category>);

impl CategorySet {
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// A fresh set holding every catalog entry.
    pub fn all() -> Self {
        Self(Category::ALL.into_iter().collect())
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_all(&self) -> bool {
        self.0.len() == Category::ALL.len()
    }

    /// Returns a copy with `category` added if absent, removed if present.
    pub fn toggled(&self, category: Category) -> Self {
        let mut next = self.0.clone();
        if !next.remove(&category) {
            next.insert(category);
        }
        Self(next)
    }

    /// A proper, non-empty subset of the catalog: the only selection that
    /// actually narrows the feed.
    pub fn is_narrowing(&self) -> bool {
        !self.is_empty() && !self.is_all()
    }

    /// True if any of the item's raw categories is selected, ignoring case.
    pub fn matches(&self, item: &NewsItem) -> bool {
        item.categories
            .iter()
            .filter_map(|raw| Category::from_feed(raw))
            .any(|c| self.contains(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Filter State
// ============================================================================

/// What the user has picked in the filter and sort sheets.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub categories: CategorySet,
    pub window: TimeWindow,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            categories: CategorySet::all(),
            window: TimeWindow::All,
        }
    }
}

impl FilterState {
    pub fn new(categories: CategorySet, window: TimeWindow) -> Self {
        Self { categories, window }
    }

    pub fn toggle_category(&self, category: Category) -> Self {
        Self {
            categories: self.categories.toggled(category),
            window: self.window,
        }
    }

    pub fn clear_all_categories(&self) -> Self {
        Self {
            categories: CategorySet::empty(),
            window: self.window,
        }
    }

    pub fn select_all_categories(&self) -> Self {
        Self {
            categories: CategorySet::all(),
            window: self.window,
        }
    }

    pub fn set_time_window(&self, window: TimeWindow) -> Self {
        Self {
            categories: self.categories.clone(),
            window,
        }
    }

    /// Whether the filter badge should be lit.
    pub fn has_active_filters(&self) -> bool {
        self.categories.is_narrowing()
    }

    /// Whether the sort badge should be lit.
    pub fn has_active_sort(&self) -> bool {
        self.window.is_active()
    }

    pub fn apply(&self, items: &[NewsItem], now: DateTime<Utc>) -> Vec<NewsItem> {
        filter_news(items, &self.categories, self.window, now)
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Filters `items` by category and recency, as of `now`.
///
/// Input order is preserved and the input slice is left untouched.
pub fn filter_news(
    items: &[NewsItem],
    categories: &CategorySet,
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Vec<NewsItem> {
    if items.is_empty() {
        return Vec::new();
    }

    let cutoff = window.cutoff(now);
    let narrowing = categories.is_narrowing();

    let filtered: Vec<NewsItem> = items
        .iter()
        .filter(|item| !narrowing || categories.matches(item))
        .filter(|item| match cutoff {
            Some(cutoff) => is_recent(item, cutoff),
            None => true,
        })
        .cloned()
        .collect();

    debug!(
        "Filtered {} -> {} items (categories: {}, window: {})",
        items.len(),
        filtered.len(),
        categories.len(),
        window
    );
    filtered
}

/// [`filter_news`] against the system clock.
pub fn filter_news_now(
    items: &[NewsItem],
    categories: &CategorySet,
    window: TimeWindow,
) -> Vec<NewsItem> {
    filter_news(items, categories, window, Utc::now())
}

/// Fail-open: an unparsable timestamp counts as recent.
fn is_recent(item: &NewsItem, cutoff: DateTime<Utc>) -> bool {
    match parse_published(&item.published) {
        Some(published) => published >= cutoff,
        None => true,
    }
}

/// Parses the timestamp formats the feed backend has been seen to emit.
/// Offset-less values are read as UTC. A bare 10-digit number is Unix
/// seconds.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.len() == 10 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixed_now, news_item};

    fn hours_ago(hours: i64) -> String {
        (fixed_now() - Duration::hours(hours)).to_rfc3339()
    }

    fn sample_feed() -> Vec<NewsItem> {
        vec![
            news_item("a", &["TECH"], &hours_ago(2)),
            news_item("b", &["sports"], &hours_ago(3)),
            news_item("c", &["tech", "WORLD"], &hours_ago(30)),
            news_item("d", &["BUSINESS"], &hours_ago(24 * 10)),
            news_item("e", &["LOCAL"], &hours_ago(1)),
        ]
    }

    fn hashes(items: &[NewsItem]) -> Vec<&str> {
        items.iter().map(|i| i.item_hash.as_str()).collect()
    }

    #[test]
    fn test_full_selection_and_all_window_is_identity() {
        let feed = sample_feed();
        let out = filter_news(&feed, &CategorySet::all(), TimeWindow::All, fixed_now());
        assert_eq!(out, feed);
    }

    #[test]
    fn test_empty_selection_passes_everything() {
        let feed = sample_feed();
        let out = filter_news(&feed, &CategorySet::empty(), TimeWindow::All, fixed_now());
        assert_eq!(out, feed);
    }

    #[test]
    fn test_tech_today_matches_case_insensitively() {
        let feed = vec![
            news_item("upper", &["TECH"], &hours_ago(2)),
            news_item("lower", &["tech"], &hours_ago(5)),
            news_item("old", &["TECH"], &hours_ago(25)),
            news_item("other", &["SPORTS"], &hours_ago(1)),
        ];
        let selection: CategorySet = [Category::Tech].into_iter().collect();
        let out = filter_news(&feed, &selection, TimeWindow::Today, fixed_now());
        assert_eq!(hashes(&out), vec!["upper", "lower"]);
    }

    #[test]
    fn test_unknown_categories_never_match_a_narrowed_selection() {
        let feed = sample_feed();
        let selection: CategorySet = [Category::Tech, Category::World].into_iter().collect();
        let out = filter_news(&feed, &selection, TimeWindow::All, fixed_now());
        assert_eq!(hashes(&out), vec!["a", "c"]);
    }

    #[test]
    fn test_unparsable_timestamp_is_kept_for_every_window() {
        let feed = vec![
            news_item("bad", &["TECH"], "not a date"),
            news_item("empty", &["TECH"], ""),
        ];
        for window in TimeWindow::ALL {
            let out = filter_news(&feed, &CategorySet::all(), window, fixed_now());
            assert_eq!(out.len(), 2, "window {window} dropped a malformed item");
        }
    }

    #[test]
    fn test_windows_cut_at_the_expected_age() {
        let feed = sample_feed();
        let all = CategorySet::all();
        let count = |w| filter_news(&feed, &all, w, fixed_now()).len();
        assert_eq!(count(TimeWindow::Today), 3);
        assert_eq!(count(TimeWindow::Hours48), 4);
        assert_eq!(count(TimeWindow::Days7), 4);
        assert_eq!(count(TimeWindow::Days14), 5);
    }

    #[test]
    fn test_cutoff_boundary_is_inclusive() {
        let feed = vec![news_item("edge", &["TOP"], &hours_ago(24))];
        let out = filter_news(&feed, &CategorySet::all(), TimeWindow::Today, fixed_now());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let out = filter_news(&[], &CategorySet::all(), TimeWindow::Today, fixed_now());
        assert!(out.is_empty());
    }

    #[test]
    fn test_select_all_then_toggle_does_not_alias() {
        let state = FilterState::default().clear_all_categories();
        let full = state.select_all_categories();
        let toggled = full.toggle_category(Category::Cricket);
        assert_eq!(toggled.categories.len(), Category::ALL.len() - 1);
        assert!(!toggled.categories.contains(Category::Cricket));
        assert!(full.categories.is_all());
        assert!(state.categories.is_empty());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let set = CategorySet::empty().toggled(Category::Health);
        assert!(set.contains(Category::Health));
        assert!(set.toggled(Category::Health).is_empty());
    }

    #[test]
    fn test_has_active_filters() {
        let state = FilterState::default();
        assert!(!state.has_active_filters());
        assert!(!state.clear_all_categories().has_active_filters());
        assert!(state.toggle_category(Category::Top).has_active_filters());
        let single = state.clear_all_categories().toggle_category(Category::India);
        assert!(single.has_active_filters());
    }

    #[test]
    fn test_has_active_sort() {
        let state = FilterState::default();
        assert!(!state.has_active_sort());
        assert!(state.set_time_window(TimeWindow::Days7).has_active_sort());
    }

    #[test]
    fn test_time_window_parsing() {
        assert_eq!("48h".parse::<TimeWindow>(), Ok(TimeWindow::Hours48));
        assert_eq!("Today".parse::<TimeWindow>(), Ok(TimeWindow::Today));
        assert_eq!("forever".parse::<TimeWindow>(), Ok(TimeWindow::All));
        assert!("1y".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn test_time_window_serde_accepts_forever_alias() {
        let w: TimeWindow = serde_json::from_str("\"forever\"").unwrap();
        assert_eq!(w, TimeWindow::All);
        assert_eq!(serde_json::to_string(&TimeWindow::Days14).unwrap(), "\"14d\"");
    }

    #[test]
    fn test_parse_published_formats() {
        let expected = "2025-03-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(parse_published("2025-03-01T12:00:00Z"), Some(expected));
        assert_eq!(parse_published("2025-03-01T17:30:00+05:30"), Some(expected));
        assert_eq!(parse_published("Sat, 01 Mar 2025 12:00:00 +0000"), Some(expected));
        assert_eq!(parse_published("2025-03-01 12:00:00"), Some(expected));
        assert_eq!(parse_published("2025-03-01T12:00:00.000"), Some(expected));
        assert!(parse_published("2025-03-01").is_some());
        assert!(parse_published("yesterday").is_none());
    }

    #[test]
    fn test_parse_published_unix_seconds() {
        let expected = "2025-03-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(parse_published("1740830400"), Some(expected));
        assert_eq!(parse_published(" 1740830400 "), Some(expected));
        // Only the 10-digit seconds shape counts; other numbers stay unparsed.
        assert!(parse_published("1740830400000").is_none());
        assert!(parse_published("12345").is_none());
    }

    #[test]
    fn test_unix_seconds_are_time_filtered() {
        // 2025-05-16T12:00:00Z, thirty days before fixed_now()
        let items = vec![
            news_item("old", &["TECH"], "1747396800"),
            news_item("new", &["TECH"], &(fixed_now() - Duration::hours(1)).timestamp().to_string()),
        ];
        let kept = filter_news(&items, &CategorySet::all(), TimeWindow::Today, fixed_now());
        let hashes: Vec<_> = kept.iter().map(|i| i.item_hash.as_str()).collect();
        assert_eq!(hashes, vec!["new"]);

        assert_eq!(filter_news(&items, &CategorySet::all(), TimeWindow::All, fixed_now()).len(), 2);
    }
}
