//! # Library Persistence
//!
//! Bookmarks and likes, saved to `~/.feedlens/library.json`.
//!
//! Bookmarks keep a full copy of the article so they still render after the
//! item has aged out of the feed. Likes are just item hashes.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::feed::NewsItem;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Library {
    #[serde(default)]
    pub bookmarks: BTreeMap<String, NewsItem>,
    #[serde(default)]
    pub likes: BTreeSet<String>,
}

impl Library {
    /// Bookmarks an item. An existing bookmark with the same hash is kept
    /// as-is. Returns `true` if the item was newly added.
    pub fn add_bookmark(&mut self, item: NewsItem) -> bool {
        if self.bookmarks.contains_key(&item.item_hash) {
            return false;
        }
        self.bookmarks.insert(item.item_hash.clone(), item);
        true
    }

    pub fn remove_bookmark(&mut self, item_hash: &str) -> bool {
        self.bookmarks.remove(item_hash).is_some()
    }

    pub fn is_bookmarked(&self, item_hash: &str) -> bool {
        self.bookmarks.contains_key(item_hash)
    }

    /// Bookmarked items in hash order.
    pub fn bookmarked_items(&self) -> Vec<NewsItem> {
        self.bookmarks.values().cloned().collect()
    }

    pub fn like(&mut self, item_hash: &str) -> bool {
        self.likes.insert(item_hash.to_string())
    }

    pub fn unlike(&mut self, item_hash: &str) -> bool {
        self.likes.remove(item_hash)
    }

    pub fn is_liked(&self, item_hash: &str) -> bool {
        self.likes.contains(item_hash)
    }
}

/// Returns `~/.feedlens/library.json`.
pub fn library_path() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    Ok(home.join(".feedlens").join("library.json"))
}

/// Loads the library from `path`. A missing file is an empty library.
pub fn load_library_from(path: &Path) -> io::Result<Library> {
    if !path.exists() {
        debug!("No library at {}, starting empty", path.display());
        return Ok(Library::default());
    }
    let json = fs::read_to_string(path)?;
    let library: Library =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    info!(
        "Loaded library: {} bookmarks, {} likes",
        library.bookmarks.len(),
        library.likes.len()
    );
    Ok(library)
}

/// Atomically writes the library to `path`, creating parent directories.
pub fn save_library_to(path: &Path, library: &Library) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(library)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    debug!("Library saved to {}", path.display());
    Ok(())
}

pub fn load_library() -> io::Result<Library> {
    load_library_from(&library_path()?)
}

pub fn save_library(library: &Library) -> io::Result<()> {
    save_library_to(&library_path()?, library)
}

/// Saves, logging instead of failing. Called on `Effect::SaveLibrary`.
pub fn persist(library: &Library) {
    if let Err(e) = save_library(library) {
        warn!("Failed to save library: {}", e);
    }
}
