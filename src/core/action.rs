//! # Actions
//!
//! Everything the user can do to the reader becomes an `Action`.
//! Tapping a category chip? That's `Action::ToggleCategory(category)`.
//! Saving an article? That's `Action::AddBookmark(item)`.
//!
//! `update()` applies an action to the state and returns an [`Effect`]
//! describing any I/O the caller should perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::category::Category;
use crate::core::filter::TimeWindow;
use crate::core::state::{App, HapticFeedback, ShareEvent, Theme};
use crate::feed::NewsItem;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleCategory(Category),
    ClearAllCategories,
    SelectAllCategories,
    SetTimeWindow(TimeWindow),
    AddBookmark(NewsItem),
    RemoveBookmark(String),
    Like(String),
    Unlike(String),
    Share { pk: String, sk: String },
    SetTheme(Theme),
    SetHapticFeedback(HapticFeedback),
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The library changed and should be written to disk.
    SaveLibrary,
    /// A setting changed and should be written to disk.
    SaveSettings,
    /// Hand the item off to the platform share sheet.
    Share(ShareEvent),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("Action: {}", action_name(&action));
    match action {
        Action::ToggleCategory(category) => {
            app.filters = app.filters.toggle_category(category);
            Effect::None
        }
        Action::ClearAllCategories => {
            app.filters = app.filters.clear_all_categories();
            Effect::None
        }
        Action::SelectAllCategories => {
            app.filters = app.filters.select_all_categories();
            Effect::None
        }
        Action::SetTimeWindow(window) => {
            app.filters = app.filters.set_time_window(window);
            Effect::None
        }
        Action::AddBookmark(item) => changed(app.library.add_bookmark(item)),
        Action::RemoveBookmark(hash) => changed(app.library.remove_bookmark(&hash)),
        Action::Like(hash) => changed(app.library.like(&hash)),
        Action::Unlike(hash) => changed(app.library.unlike(&hash)),
        Action::Share { pk, sk } => {
            let event = ShareEvent { pk, sk };
            app.shares.push(event.clone());
            Effect::Share(event)
        }
        Action::SetTheme(theme) => {
            let previous = std::mem::replace(&mut app.settings.theme, theme);
            settings_changed(previous != theme)
        }
        Action::SetHapticFeedback(haptics) => {
            let previous = std::mem::replace(&mut app.settings.haptic_feedback, haptics);
            settings_changed(previous != haptics)
        }
    }
}

/// Only touch the disk when the library actually changed.
fn changed(did_change: bool) -> Effect {
    if did_change { Effect::SaveLibrary } else { Effect::None }
}

fn settings_changed(did_change: bool) -> Effect {
    if did_change { Effect::SaveSettings } else { Effect::None }
}

// Bookmark payloads are whole articles; keep the log line short.
fn action_name(action: &Action) -> &'static str {
    match action {
        Action::ToggleCategory(_) => "ToggleCategory",
        Action::ClearAllCategories => "ClearAllCategories",
        Action::SelectAllCategories => "SelectAllCategories",
        Action::SetTimeWindow(_) => "SetTimeWindow",
        Action::AddBookmark(_) => "AddBookmark",
        Action::RemoveBookmark(_) => "RemoveBookmark",
        Action::Like(_) => "Like",
        Action::Unlike(_) => "Unlike",
        Action::Share { .. } => "Share",
        Action::SetTheme(_) => "SetTheme",
        Action::SetHapticFeedback(_) => "SetHapticFeedback",
    }
}
