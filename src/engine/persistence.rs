//! Snapshot capture and restore through the injected [`ConfigStore`].
//!
//! [`ConfigStore`]: crate::options::ConfigStore

use super::GlobeEngine;
use crate::error::TerraError;
use crate::options::ConfigSnapshot;
use crate::texture::DEFAULT_LAYERS;

impl GlobeEngine {
    /// Current state as a config record.
    #[must_use]
    pub fn snapshot(&self) -> ConfigSnapshot {
        let camera = self.view.options();
        ConfigSnapshot {
            resolution: [self.size.0, self.size.1],
            texture: self
                .layers
                .active_name()
                .unwrap_or(DEFAULT_LAYERS[0].0)
                .to_owned(),
            auto_rotate: self.view.state().auto_rotate,
            mouse_sensitivity: camera.mouse_sensitivity,
            zoom_sensitivity: camera.zoom_sensitivity,
            last_position: self.view.saved_position(),
            view_mode: self.toggles.view_mode,
            animation_enabled: self.animation.enabled,
            sound_enabled: self.toggles.sound,
            effects_enabled: self.toggles.effects,
            atmosphere_enabled: self.toggles.atmosphere,
        }
    }

    /// Restore from `snapshot`. Camera values are clamped into range; an
    /// unknown layer name keeps the current layer. The resolution is left to
    /// the window owner.
    pub fn apply_snapshot(&mut self, snapshot: &ConfigSnapshot) {
        self.view
            .set_sensitivity(snapshot.mouse_sensitivity, snapshot.zoom_sensitivity);
        let pos = snapshot.last_position;
        self.view.set_view(pos.x, pos.y, pos.distance);
        self.view.set_auto_rotate(snapshot.auto_rotate);

        if !self.layers.set_active(&snapshot.texture) {
            log::warn!(
                "unknown layer {:?}, keeping {:?}",
                snapshot.texture,
                self.layers.active_name()
            );
        }

        self.toggles.view_mode = snapshot.view_mode;
        self.toggles.sound = snapshot.sound_enabled;
        self.toggles.effects = snapshot.effects_enabled;
        self.toggles.atmosphere = snapshot.atmosphere_enabled;
        if self.animation.enabled != snapshot.animation_enabled {
            let _ = self.animation.toggle();
        }
    }

    /// Write [`snapshot`](Self::snapshot) to the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    pub fn save_state(&self) -> Result<(), TerraError> {
        self.store.save(&self.snapshot())?;
        log::info!("state saved");
        Ok(())
    }

    /// Read the store and apply it. On failure the current state is kept.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the read fails.
    pub fn load_state(&mut self) -> Result<(), TerraError> {
        let snapshot = self.store.load()?;
        self.apply_snapshot(&snapshot);
        log::info!("state loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::command::GlobeCommand;
    use crate::engine::tests::{engine, MemoryStore};
    use crate::options::{ConfigSnapshot, SavedPosition, ViewMode};

    #[test]
    fn snapshot_reflects_state() {
        let mut e = engine(MemoryStore::default());
        e.execute(GlobeCommand::CycleLayer);
        e.execute(GlobeCommand::ToggleAtmosphere);
        let s = e.snapshot();
        assert_eq!(s.texture, "Political");
        assert!(s.atmosphere_enabled);
        assert_eq!(s.resolution, [1280, 720]);
        assert_eq!(s.last_position, SavedPosition::default());
    }

    #[test]
    fn restore_clamps_out_of_range_values() {
        let mut e = engine(MemoryStore::default());
        e.apply_snapshot(&ConfigSnapshot {
            last_position: SavedPosition {
                x: 200.0,
                y: 45.0,
                distance: -100.0,
            },
            ..ConfigSnapshot::default()
        });
        let s = e.view().state();
        assert_eq!(s.rotation_x, 85.0);
        assert_eq!(s.rotation_y, 45.0);
        assert_eq!(s.distance, -15.0);
    }

    #[test]
    fn unknown_layer_keeps_current() {
        let mut e = engine(MemoryStore::default());
        e.apply_snapshot(&ConfigSnapshot {
            texture: "Mars".to_owned(),
            ..ConfigSnapshot::default()
        });
        assert_eq!(e.layers().active_name(), Some("Default"));
    }

    #[test]
    fn save_then_load_restores() {
        let store = MemoryStore::default();
        let mut e = engine(store.clone());
        e.execute(GlobeCommand::CycleViewMode);
        e.execute(GlobeCommand::CycleLayer);
        e.execute(GlobeCommand::ToggleAnimation);
        e.execute(GlobeCommand::SaveState);

        let mut fresh = engine(store);
        fresh.execute(GlobeCommand::LoadState);
        assert_eq!(fresh.toggles().view_mode, ViewMode::Wireframe);
        assert_eq!(fresh.layers().active_name(), Some("Political"));
        assert!(fresh.animation().enabled);
    }

    #[test]
    fn failed_load_keeps_state() {
        let mut e = engine(MemoryStore::default());
        e.execute(GlobeCommand::CycleViewMode);
        // Nothing saved yet: the store reports an error.
        e.execute(GlobeCommand::LoadState);
        assert_eq!(e.toggles().view_mode, ViewMode::Wireframe);
    }

    #[test]
    fn json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("terra_config.json");
        let mut e = crate::engine::tests::engine_with(Box::new(
            crate::options::JsonFileStore::new(&path),
        ));
        e.execute(GlobeCommand::ToggleEffects);
        e.execute(GlobeCommand::SaveState);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"effects_enabled\": false"));
    }
}
