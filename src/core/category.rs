//! # Categories
//!
//! The fixed vocabulary of news categories. Feed items carry free-form
//! category strings; the filter engine only ever compares them against
//! this closed set, so an unknown string simply never matches.
//!
//! Catalog order matters: it is the order categories are listed in the
//! filter picker and the order `Category::ALL` iterates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    India,
    Tech,
    World,
    Sports,
    Business,
    Cricket,
    Health,
    Top,
}

/// Icon shown next to the "all categories" pseudo-entry.
pub const ALL_CATEGORIES_ICON: &str = "globe-outline";
pub const ALL_CATEGORIES_DISPLAY_NAME: &str = "All Categories";
pub const ALL_CATEGORIES_DESCRIPTION: &str = "All news from all sources";

const FALLBACK_ICON: &str = "newspaper-outline";
const FALLBACK_DESCRIPTION: &str = "News category";

impl Category {
    /// Every supported category, in catalog order.
    pub const ALL: [Category; 8] = [
        Category::India,
        Category::Tech,
        Category::World,
        Category::Sports,
        Category::Business,
        Category::Cricket,
        Category::Health,
        Category::Top,
    ];

    /// Upper-case wire code, as it appears on feed items.
    pub fn code(self) -> &'static str {
        match self {
            Category::India => "INDIA",
            Category::Tech => "TECH",
            Category::World => "WORLD",
            Category::Sports => "SPORTS",
            Category::Business => "BUSINESS",
            Category::Cricket => "CRICKET",
            Category::Health => "HEALTH",
            Category::Top => "TOP",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::India => "India",
            Category::Tech => "Tech",
            Category::World => "World",
            Category::Sports => "Sports",
            Category::Business => "Business",
            Category::Cricket => "Cricket",
            Category::Health => "Health",
            Category::Top => "Top",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::India => "News from India",
            Category::Tech => "Technology and innovation",
            Category::World => "International news",
            Category::Sports => "Sports news and updates",
            Category::Business => "Business and finance",
            Category::Cricket => "Cricket news and scores",
            Category::Health => "Health and wellness",
            Category::Top => "Top trending stories",
        }
    }

    /// Ionicons glyph name used by the picker.
    pub fn icon(self) -> &'static str {
        match self {
            Category::India => "location-outline",
            Category::Tech => "laptop-outline",
            Category::World => "earth-outline",
            Category::Sports => "football-outline",
            Category::Business => "business-outline",
            Category::Cricket => "baseball-outline",
            Category::Health => "medical-outline",
            Category::Top => "trending-up-outline",
        }
    }

    /// Matches a raw feed category against the catalog, ignoring case.
    pub fn from_feed(raw: &str) -> Option<Category> {
        raw.parse().ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Category::ALL
            .into_iter()
            .find(|c| c.code() == upper)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Display name for any category string a feed might send.
/// Unknown codes are capitalized: `"LOCAL"` becomes `"Local"`.
pub fn display_name_for(raw: &str) -> String {
    if raw.eq_ignore_ascii_case("all") {
        return ALL_CATEGORIES_DISPLAY_NAME.to_string();
    }
    if let Some(category) = Category::from_feed(raw) {
        return category.display_name().to_string();
    }
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str().to_lowercase()),
        None => String::new(),
    }
}

pub fn description_for(raw: &str) -> &'static str {
    if raw.eq_ignore_ascii_case("all") {
        return ALL_CATEGORIES_DESCRIPTION;
    }
    Category::from_feed(raw).map_or(FALLBACK_DESCRIPTION, Category::description)
}

pub fn icon_for(raw: &str) -> &'static str {
    if raw.eq_ignore_ascii_case("all") {
        return ALL_CATEGORIES_ICON;
    }
    Category::from_feed(raw).map_or(FALLBACK_ICON, Category::icon)
}
