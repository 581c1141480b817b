//! # Application State
//!
//! Everything the reader remembers, in one explicit container. No globals:
//! front ends own an `App` and change it only through `update()` in
//! action.rs.
//!
//! ```text
//! App
//! ├── filters: FilterState        // category selection + time window
//! ├── library: Library            // bookmarks + likes (persisted)
//! ├── shares: Vec<ShareEvent>     // shares this run (not persisted)
//! ├── settings: Settings          // theme + haptics (persisted)
//! └── locale: DetectedLocale      // country/language in effect
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::filter::{FilterState, TimeWindow};
use crate::core::library::Library;
use crate::core::locale::DetectedLocale;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HapticFeedback {
    #[default]
    Enabled,
    Disabled,
}

/// Display preferences. Missing fields in a saved file take their default.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub haptic_feedback: HapticFeedback,
}

/// A share the user triggered, identified by the item's table keys.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ShareEvent {
    pub pk: String,
    pub sk: String,
}

#[derive(Debug, Clone, Default)]
pub struct App {
    pub filters: FilterState,
    pub library: Library,
    pub shares: Vec<ShareEvent>,
    pub settings: Settings,
    pub locale: DetectedLocale,
}

impl App {
    pub fn new(library: Library, settings: Settings, locale: DetectedLocale, window: TimeWindow) -> Self {
        Self {
            filters: FilterState::default().set_time_window(window),
            library,
            shares: Vec::new(),
            settings,
            locale,
        }
    }
}
