// Settings persisted between runs: panel position, pin-on-top and slot count

use crate::errors::{PreviewError, PreviewResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_DIR: &str = "winview_strip";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Top-left corner of the panel in screen coordinates
    pub position: Option<(i32, i32)>,
    pub always_on_top: bool,
    pub slot_count: usize,
}

impl Settings {
    pub fn with_slot_count(slot_count: usize) -> Self {
        Self {
            position: None,
            always_on_top: false,
            slot_count,
        }
    }

    /// Clamp the slot count into `1..=capacity`
    pub fn sanitized(mut self, capacity: usize) -> Self {
        self.slot_count = self.slot_count.clamp(1, capacity.max(1));
        self
    }
}

/// Key-value store the panel reads at startup and writes at normal shutdown
pub trait SettingsStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> PreviewResult<Option<Settings>>;
    fn save(&self, settings: &Settings) -> PreviewResult<()>;
    /// Forget everything that was saved
    fn clear(&self) -> PreviewResult<()>;

    /// Load, falling back to `None` on any store failure
    fn load_or_default(&self) -> Option<Settings> {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("⚠️ Settings store unavailable, using defaults: {}", e);
                None
            }
        }
    }
}

/// Settings kept as a JSON document on disk
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the per-user configuration directory
    pub fn in_config_dir() -> PreviewResult<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            PreviewError::Settings("no per-user configuration directory".to_string())
        })?;
        Ok(Self::new(base.join(SETTINGS_DIR).join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> PreviewResult<Option<Settings>> {
        if !self.path.exists() {
            debug!("No settings at {}", self.path.display());
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {}: {:?}", self.path.display(), settings);
        Ok(Some(settings))
    }

    fn save(&self, settings: &Settings) -> PreviewResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, contents)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> PreviewResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Store used when no settings location exists: nothing is read or kept
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSettingsStore;

impl SettingsStore for NullSettingsStore {
    fn load(&self) -> PreviewResult<Option<Settings>> {
        Ok(None)
    }

    fn save(&self, _settings: &Settings) -> PreviewResult<()> {
        debug!("No settings location, not saving");
        Ok(())
    }

    fn clear(&self) -> PreviewResult<()> {
        Ok(())
    }
}

/// JSON store under the user config directory, or a `NullSettingsStore` when
/// the platform reports no such directory
pub fn default_store() -> Box<dyn SettingsStore> {
    match JsonSettingsStore::in_config_dir() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("⚠️ {}, settings will not persist", e);
            Box::new(NullSettingsStore)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("nested").join(SETTINGS_FILE));
        assert_eq!(store.load().unwrap(), None);

        let settings = Settings {
            position: Some((120, -40)),
            always_on_top: true,
            slot_count: 5,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), Some(settings));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonSettingsStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(store.load_or_default(), None);
    }

    #[test]
    fn test_null_store_keeps_nothing() {
        let store = NullSettingsStore;
        assert_eq!(store.load().unwrap(), None);
        store.save(&Settings::with_slot_count(5)).unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
        assert_eq!(store.load_or_default(), None);
    }

    #[test]
    fn test_sanitized_clamps_slot_count() {
        assert_eq!(Settings::with_slot_count(0).sanitized(4).slot_count, 1);
        assert_eq!(Settings::with_slot_count(9).sanitized(4).slot_count, 4);
        assert_eq!(Settings::with_slot_count(3).sanitized(4).slot_count, 3);
    }
}
