//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.feedlens/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::filter::TimeWindow;
use crate::core::state::{HapticFeedback, Settings, Theme};
use crate::feed::FeedKind;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FeedlensConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub theme: Option<Theme>,
    pub haptic_feedback: Option<HapticFeedback>,
    pub default_window: Option<TimeWindow>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FeedConfig {
    pub api_endpoint: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub default_kind: Option<FeedKind>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LocaleConfig {
    pub timezone_fallback: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_FEED_COUNTRY: &str = "IN";
pub const DEFAULT_FEED_LANGUAGE: &str = "EN";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: Settings,
    pub default_window: TimeWindow,
    pub api_endpoint: Option<String>,
    pub feed_country: String,
    pub feed_language: String,
    pub default_kind: FeedKind,
    pub timezone_fallback: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.feedlens/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".feedlens").join("config.toml"))
}

/// Load config from `~/.feedlens/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FeedlensConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FeedlensConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(FeedlensConfig::default())
        }
    }
}

/// Like [`load_config`], for an explicit path.
pub fn load_config_from(path: &Path) -> Result<FeedlensConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(FeedlensConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FeedlensConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# feedlens configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# theme = "system"                   # "light", "dark" or "system"
# haptic_feedback = "enabled"        # "enabled" or "disabled"
# default_window = "all"             # "all", "today", "48h", "96h", "7d", "14d"

# [feed]
# api_endpoint = "https://api.example.com"   # Or set FEEDLENS_API_ENDPOINT
# country = "IN"                     # Or set FEEDLENS_COUNTRY
# language = "EN"                    # Or set FEEDLENS_LANGUAGE
# default_kind = "latest"            # "latest" or "top"

# [locale]
# timezone_fallback = false          # Use the system timezone when region is unknown
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_window` is from the `--window` flag (None = not specified).
pub fn resolve(config: &FeedlensConfig, cli_window: Option<TimeWindow>) -> ResolvedConfig {
    resolve_with_env(config, cli_window, |key| std::env::var(key).ok())
}

/// [`resolve`] with an explicit environment lookup.
pub fn resolve_with_env(
    config: &FeedlensConfig,
    cli_window: Option<TimeWindow>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Endpoint: env → config (no default; the feed command needs one)
    let api_endpoint = env("FEEDLENS_API_ENDPOINT")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| config.feed.api_endpoint.clone());

    // Feed locale: env → config → default
    let feed_country = env("FEEDLENS_COUNTRY")
        .or_else(|| config.feed.country.clone())
        .unwrap_or_else(|| DEFAULT_FEED_COUNTRY.to_string());

    let feed_language = env("FEEDLENS_LANGUAGE")
        .or_else(|| config.feed.language.clone())
        .unwrap_or_else(|| DEFAULT_FEED_LANGUAGE.to_string());

    ResolvedConfig {
        settings: Settings {
            theme: config.general.theme.unwrap_or_default(),
            haptic_feedback: config.general.haptic_feedback.unwrap_or_default(),
        },
        default_window: cli_window
            .or(config.general.default_window)
            .unwrap_or_default(),
        api_endpoint,
        feed_country,
        feed_language,
        default_kind: config.feed.default_kind.unwrap_or_default(),
        timezone_fallback: config.locale.timezone_fallback.unwrap_or(false),
    }
}
