//! Tuning constants and the persisted application snapshot.
//!
//! [`Options`] holds the fixed tuning values (camera, display). They are
//! plain data with `#[serde(default)]` so a partial override works, but
//! they are not written back at runtime. [`ConfigSnapshot`] is the state
//! that is saved on exit and restored on start, through a [`ConfigStore`].

mod camera;
mod display;
mod snapshot;

use std::path::{Path, PathBuf};

pub use camera::CameraOptions;
pub use display::DisplayOptions;
use serde::{Deserialize, Serialize};
pub use snapshot::{ConfigSnapshot, SavedPosition, ViewMode};

use crate::error::TerraError;

/// Top-level tuning container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Globe geometry and frame pacing.
    pub display: DisplayOptions,
}

/// Reads and writes [`ConfigSnapshot`]s.
pub trait ConfigStore {
    /// Read the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is missing or unreadable.
    fn load(&self) -> Result<ConfigSnapshot, TerraError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), TerraError>;
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`. Nothing is touched until load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<ConfigSnapshot, TerraError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), TerraError> {
        let content = serde_json::to_string_pretty(snapshot)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Load from `store`, falling back to defaults (with a log line) on any
/// failure.
pub fn load_or_default(store: &dyn ConfigStore) -> ConfigSnapshot {
    match store.load() {
        Ok(snapshot) => snapshot,
        Err(TerraError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("no saved state, using defaults");
            ConfigSnapshot::default()
        }
        Err(e) => {
            log::warn!("failed to load saved state, using defaults: {e}");
            ConfigSnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("nested").join("terra.json"))
    }

    #[test]
    fn snapshot_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let snapshot = ConfigSnapshot {
            resolution: [800, 600],
            texture: "Political".into(),
            auto_rotate: false,
            mouse_sensitivity: 0.35,
            zoom_sensitivity: 0.25,
            last_position: SavedPosition {
                x: 12.5,
                y: -40.0,
                distance: -7.25,
            },
            view_mode: ViewMode::Night,
            animation_enabled: true,
            sound_enabled: false,
            effects_enabled: false,
            atmosphere_enabled: true,
        };
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), snapshot);
    }

    #[test]
    fn partial_file_fills_defaults_and_ignores_unknown_keys() {
        let json = r#"{
            "texture": "Detailed",
            "last_position": { "distance": -9.0 },
            "view_mode": "Wireframe",
            "window_title": "ignored"
        }"#;
        let snapshot: ConfigSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.texture, "Detailed");
        assert_eq!(snapshot.view_mode, ViewMode::Wireframe);
        assert_eq!(snapshot.last_position.distance, -9.0);
        assert_eq!(snapshot.last_position.y, 180.0);
        assert_eq!(snapshot.resolution, [1280, 720]);
        assert!(snapshot.auto_rotate);
    }

    #[test]
    fn saved_keys_match_file_format() {
        let value = serde_json::to_value(ConfigSnapshot::default()).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "resolution",
            "texture",
            "auto_rotate",
            "mouse_sensitivity",
            "zoom_sensitivity",
            "last_position",
            "view_mode",
            "animation_enabled",
            "sound_enabled",
            "effects_enabled",
            "atmosphere_enabled",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj["view_mode"], "Normal");
        assert_eq!(obj["last_position"]["y"], 180.0);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(matches!(store.load(), Err(TerraError::Io(_))));
        assert_eq!(load_or_default(&store), ConfigSnapshot::default());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terra.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(TerraError::Config(_))));
        assert_eq!(load_or_default(&store), ConfigSnapshot::default());
    }

    #[test]
    fn view_mode_cycle_wraps() {
        let mut mode = ViewMode::Normal;
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            [
                ViewMode::Wireframe,
                ViewMode::Points,
                ViewMode::Night,
                ViewMode::Normal
            ]
        );
    }

    #[test]
    fn partial_options_keep_defaults() {
        let opts: Options =
            serde_json::from_str(r#"{ "display": { "segments": 48 } }"#)
                .unwrap();
        assert_eq!(opts.display.segments, 48);
        assert_eq!(opts.display.globe_radius, 2.0);
        assert_eq!(opts.camera, CameraOptions::default());
    }
}
