//! Persistent key/value storage for client preferences.
//!
//! Values are JSON files in a directory, by default the platform config
//! directory:
//!   - Linux: `~/.config/logdeck/`
//!   - macOS: `~/Library/Application Support/logdeck/`
//!   - Windows: `%APPDATA%\logdeck\`
//!
//! Only preferences live here. Log history is never written to disk.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "logdeck";

/// A directory of JSON documents keyed by name.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Storage rooted in the platform config directory.
    ///
    /// Returns `None` when the platform has no config directory.
    pub fn default_location() -> Option<Self> {
        let config_dir = dirs::config_dir()?;
        Some(Self::at(config_dir.join(APP_DIR)))
    }

    /// Storage rooted at an explicit directory (created lazily on save).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a value.
    ///
    /// Returns `true` if the operation succeeded.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.save_raw(key, &json),
            Err(_) => false,
        }
    }

    /// Load a value.
    ///
    /// Returns `None` if the key doesn't exist or deserialization fails.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.load_raw(key)?;
        serde_json::from_str(&json).ok()
    }

    fn file_path(&self, key: &str) -> PathBuf {
        // Sanitize key to be a valid filename
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.dir.join(format!("{}.json", safe_key))
    }

    fn save_raw(&self, key: &str, value: &str) -> bool {
        if !self.dir.exists() && std::fs::create_dir_all(&self.dir).is_err() {
            return false;
        }
        std::fs::write(self.file_path(key), value).is_ok()
    }

    fn load_raw(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.file_path(key)).ok()
    }
}
