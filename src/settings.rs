use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PersistenceError;

pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 300_000;

/// Top-left corner of the widget in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 100, y: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Refresh interval in milliseconds
    pub update_interval: u64,
    pub last_position: Position,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL_MS,
            last_position: Position::default(),
        }
    }
}

impl Settings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval)
    }
}

/// Reads and writes [Settings] at a single fixed path
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    const FILE_NAME: &'static str = "settings.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.local/share/weather-widget/settings.json`, or in the
    /// working directory when `HOME` is unset.
    pub fn open() -> Self {
        let path = match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home)
                .join(".local/share/weather-widget")
                .join(Self::FILE_NAME),
            Err(_) => {
                warn!("HOME is not set, keeping settings in the working directory");
                PathBuf::from(Self::FILE_NAME)
            }
        };
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, substituting defaults for anything missing or broken.
    /// Never fails.
    pub fn load(&self) -> Settings {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", self.path.display());
                return Settings::default();
            }
            Err(err) => {
                warn!(
                    "Failed to read settings from {}, using defaults: {err}",
                    self.path.display()
                );
                return Settings::default();
            }
        };

        let mut settings: Settings = match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(
                    "Failed to parse settings at {}, using defaults: {err}",
                    self.path.display()
                );
                return Settings::default();
            }
        };

        if settings.update_interval == 0 {
            warn!("Refresh interval of 0ms is invalid, using the default");
            settings.update_interval = DEFAULT_UPDATE_INTERVAL_MS;
        }

        settings
    }

    /// Overwrite the settings file with `settings`. Not retried.
    pub fn save(&self, settings: &Settings) -> Result<(), PersistenceError> {
        let content = serde_json::to_string_pretty(settings)?;
        let io_err = |source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(&self.path, content).map_err(io_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.json"))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = store_in(&dir).load();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.update_interval, 300_000);
        assert_eq!(settings.last_position, Position { x: 100, y: 100 });
    }

    #[test]
    fn malformed_files_load_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for content in [
            "",
            "{",
            "not json at all",
            "[1, 2, 3]",
            r#"{"update_interval": "soon"}"#,
            r#"{"last_position": {"x": 1.5, "y": 2}}"#,
            "\u{0}\u{1}",
        ] {
            fs::write(store.path(), content).unwrap();
            assert_eq!(store.load(), Settings::default(), "content: {content:?}");
        }
    }

    #[test]
    fn missing_field_gets_its_default() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"update_interval": 60000}"#).unwrap();

        let settings = store.load();
        assert_eq!(settings.update_interval, 60_000);
        assert_eq!(settings.last_position, Position::default());
    }

    #[test]
    fn zero_interval_is_replaced() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"update_interval": 0, "last_position": {"x": 5, "y": 6}}"#,
        )
        .unwrap();

        let settings = store.load();
        assert_eq!(settings.update_interval, DEFAULT_UPDATE_INTERVAL_MS);
        assert_eq!(settings.last_position, Position { x: 5, y: 6 });
    }

    #[test]
    fn save_then_load_is_stable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let settings = Settings {
            update_interval: 120_000,
            last_position: Position { x: -40, y: 900 },
        };

        store.save(&settings).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();
        assert_eq!(store.load(), settings);

        store.save(&store.load()).unwrap();
        let second = fs::read_to_string(store.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn file_uses_expected_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Settings::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["update_interval"], 300_000);
        assert_eq!(value["last_position"]["x"], 100);
        assert_eq!(value["last_position"]["y"], 100);
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("a/b/settings.json"));

        store.save(&Settings::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // The target path is an existing directory, so the write must fail
        let store = SettingsStore::new(dir.path());

        let err = store.save(&Settings::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
