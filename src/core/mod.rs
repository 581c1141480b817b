//! # Core Application Logic
//!
//! Feedlens's business logic. It knows nothing about the CLI or HTTP.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • locale (detection)   │
//!                    │  • filter (derivation)  │
//!                    │  • State + Action       │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No network. No UI.     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    CLI     │      │   Mobile   │      │    Feed    │
//!     │  (clap)    │      │  (future)  │      │ (reqwest)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`locale`]: best-guess country and language from device signals
//! - [`filter`]: category and time-window filtering of feed items
//! - [`category`]: the closed category vocabulary and its metadata
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and `update()`
//! - [`library`]: bookmarks and likes on disk
//! - [`settings`]: theme and haptics chosen at runtime, on disk
//! - [`config`]: `~/.feedlens/config.toml`
//! - [`format`]: compact engagement counters and relative ages

pub mod action;
pub mod category;
pub mod config;
pub mod filter;
pub mod format;
pub mod library;
pub mod locale;
pub mod settings;
pub mod state;
