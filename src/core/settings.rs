//! # Settings Persistence
//!
//! Theme and haptics chosen at runtime, saved to `~/.feedlens/settings.json`.
//!
//! `[general]` in config.toml supplies the starting values. Once the user
//! changes a setting it is written here, and the saved file wins over the
//! config from then on. Writes use atomic rename, like the library.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::core::state::Settings;

/// Returns `~/.feedlens/settings.json`.
pub fn settings_path() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    Ok(home.join(".feedlens").join("settings.json"))
}

/// Loads saved settings from `path`. `None` when nothing has been saved yet.
pub fn load_settings_from(path: &Path) -> io::Result<Option<Settings>> {
    if !path.exists() {
        debug!("No saved settings at {}", path.display());
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    let settings: Settings =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    info!("Loaded settings: {:?}", settings);
    Ok(Some(settings))
}

/// Atomically writes `settings` to `path`, creating parent directories.
pub fn save_settings_to(path: &Path, settings: &Settings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    debug!("Settings saved to {}", path.display());
    Ok(())
}

/// Saved settings if any, else `configured`. An unreadable file is logged
/// and ignored.
pub fn effective_settings_from(path: &Path, configured: Settings) -> Settings {
    match load_settings_from(path) {
        Ok(Some(saved)) => saved,
        Ok(None) => configured,
        Err(e) => {
            warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
            configured
        }
    }
}

pub fn effective_settings(configured: Settings) -> Settings {
    match settings_path() {
        Ok(path) => effective_settings_from(&path, configured),
        Err(_) => configured,
    }
}

pub fn save_settings(settings: &Settings) -> io::Result<()> {
    save_settings_to(&settings_path()?, settings)
}
