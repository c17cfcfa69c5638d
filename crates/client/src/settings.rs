//! Runtime-adjustable settings consumed by the log pipeline.
//!
//! The pipeline never caches these: the connection manager, the log store and
//! the view read [`SettingsSource::current`] at every decision point, so a
//! change made mid-session applies to the next reconnect, the next ingest or
//! the next layout pass.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::storage::Storage;

const SETTINGS_KEY: &str = "log_settings";

pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;
pub const DEFAULT_RECONNECT_BASE_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;
pub const DEFAULT_LINE_SPACING_PX: u32 = 4;

/// Font size of the log viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn px(&self) -> u32 {
        match self {
            FontSize::Small => 12,
            FontSize::Medium => 14,
            FontSize::Large => 16,
        }
    }
}

/// Settings read by the live-log pipeline.
///
/// Missing fields in a stored document fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Upper bound on cached events; oldest are evicted first.
    pub max_cache_size: usize,
    /// Linear backoff step between reconnect attempts.
    pub reconnect_base_interval_ms: u64,
    /// Automatic reconnects allowed before giving up. `0` disables them.
    pub max_reconnect_attempts: u32,
    pub font_size: FontSize,
    pub line_spacing_px: u32,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            reconnect_base_interval_ms: DEFAULT_RECONNECT_BASE_INTERVAL_MS,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            font_size: FontSize::default(),
            line_spacing_px: DEFAULT_LINE_SPACING_PX,
        }
    }
}

impl LogSettings {
    /// Replace values the pipeline cannot work with by their defaults.
    pub fn sanitized(mut self) -> Self {
        if self.max_cache_size == 0 {
            crate::log_warn!(
                "max_cache_size must be positive, using {}",
                DEFAULT_MAX_CACHE_SIZE
            );
            self.max_cache_size = DEFAULT_MAX_CACHE_SIZE;
        }
        if self.reconnect_base_interval_ms == 0 {
            crate::log_warn!(
                "reconnect_base_interval_ms must be positive, using {}",
                DEFAULT_RECONNECT_BASE_INTERVAL_MS
            );
            self.reconnect_base_interval_ms = DEFAULT_RECONNECT_BASE_INTERVAL_MS;
        }
        self
    }

    pub fn reconnect_base_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_base_interval_ms)
    }

    /// Height of one log row in pixels.
    pub fn row_height(&self) -> f64 {
        (self.font_size.px() as f64 * 1.5).ceil() + self.line_spacing_px as f64
    }
}

/// Source of the current settings.
pub trait SettingsSource: Send + Sync {
    fn current(&self) -> LogSettings;
}

impl SettingsSource for LogSettings {
    fn current(&self) -> LogSettings {
        self.clone().sanitized()
    }
}

/// Settings shared between the pipeline and whatever edits them.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<LogSettings>>,
}

impl SharedSettings {
    pub fn new(settings: LogSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Load from storage, falling back to defaults when absent or unreadable.
    pub fn load(storage: &Storage) -> Self {
        let settings = storage.load::<LogSettings>(SETTINGS_KEY).unwrap_or_else(|| {
            crate::log_info!("No stored log settings in {:?}, using defaults", storage.dir());
            LogSettings::default()
        });
        Self::new(settings)
    }

    /// Write the current values to storage. Returns `true` on success.
    pub fn save(&self, storage: &Storage) -> bool {
        storage.save(SETTINGS_KEY, &self.snapshot())
    }

    /// The stored values, without sanitizing.
    pub fn snapshot(&self) -> LogSettings {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut LogSettings)) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard);
    }
}

impl SettingsSource for SharedSettings {
    fn current(&self) -> LogSettings {
        self.snapshot().sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let settings = LogSettings {
            max_cache_size: 0,
            reconnect_base_interval_ms: 0,
            max_reconnect_attempts: 0,
            ..LogSettings::default()
        }
        .sanitized();
        assert_eq!(settings.max_cache_size, DEFAULT_MAX_CACHE_SIZE);
        assert_eq!(
            settings.reconnect_base_interval_ms,
            DEFAULT_RECONNECT_BASE_INTERVAL_MS
        );
        // zero attempts is a valid "never reconnect" choice
        assert_eq!(settings.max_reconnect_attempts, 0);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: LogSettings = serde_json::from_str(r#"{"max_cache_size": 50}"#).unwrap();
        assert_eq!(settings.max_cache_size, 50);
        assert_eq!(settings.font_size, FontSize::Medium);
        assert_eq!(settings.max_reconnect_attempts, DEFAULT_MAX_RECONNECT_ATTEMPTS);
    }

    #[test]
    fn row_height_follows_font_and_spacing() {
        let mut settings = LogSettings::default();
        assert_eq!(settings.row_height(), 25.0);
        settings.font_size = FontSize::Small;
        settings.line_spacing_px = 0;
        assert_eq!(settings.row_height(), 18.0);
        settings.font_size = FontSize::Large;
        settings.line_spacing_px = 8;
        assert_eq!(settings.row_height(), 32.0);
    }

    #[test]
    fn updates_are_visible_through_the_source() {
        let shared = SharedSettings::default();
        let source: Arc<dyn SettingsSource> = Arc::new(shared.clone());
        assert_eq!(source.current().max_cache_size, DEFAULT_MAX_CACHE_SIZE);

        shared.update(|s| s.max_cache_size = 10);
        assert_eq!(source.current().max_cache_size, 10);
    }

    #[test]
    fn persists_through_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());

        let shared = SharedSettings::load(&storage);
        assert_eq!(shared.snapshot(), LogSettings::default());

        shared.update(|s| {
            s.font_size = FontSize::Large;
            s.max_reconnect_attempts = 3;
        });
        assert!(shared.save(&storage));

        let reloaded = SharedSettings::load(&storage).snapshot();
        assert_eq!(reloaded.font_size, FontSize::Large);
        assert_eq!(reloaded.max_reconnect_attempts, 3);
    }
}
