//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use chrono::{DateTime, TimeZone, Utc};

use crate::core::locale::{LocaleError, LocaleSignal, LocaleSource};
use crate::feed::NewsItem;

/// A locale source whose platform capability is missing.
pub struct FailingLocaleSource;

impl LocaleSource for FailingLocaleSource {
    fn locales(&self) -> Result<Vec<LocaleSignal>, LocaleError> {
        Err(LocaleError::Unavailable("no locale capability".to_string()))
    }
}

/// A locale source whose secondary region accessor disagrees with the
/// primary locale's region.
pub struct SecondaryRegionSource {
    pub primary: LocaleSignal,
    pub region: Option<String>,
}

impl LocaleSource for SecondaryRegionSource {
    fn locales(&self) -> Result<Vec<LocaleSignal>, LocaleError> {
        Ok(vec![self.primary.clone()])
    }

    fn region(&self) -> Option<String> {
        self.region.clone()
    }
}

pub fn signal(
    region: Option<&str>,
    language: Option<&str>,
    currency: Option<&str>,
    timezone: Option<&str>,
) -> LocaleSignal {
    LocaleSignal {
        region_code: region.map(str::to_string),
        language_code: language.map(str::to_string),
        currency_code: currency.map(str::to_string),
        timezone: timezone.map(str::to_string),
    }
}

/// The instant every time-window test is evaluated at.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// A feed item with just the fields the filter engine looks at.
pub fn news_item(item_hash: &str, categories: &[&str], published: &str) -> NewsItem {
    NewsItem {
        pk: format!("NEWS#{item_hash}"),
        sk: format!("ITEM#{item_hash}"),
        item_hash: item_hash.to_string(),
        headline: format!("Headline {item_hash}"),
        published: published.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

/// Creates a test App with default filters and an empty library.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::default()
}
