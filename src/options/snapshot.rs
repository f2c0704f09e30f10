use std::fmt;

use serde::{Deserialize, Serialize};

/// How the globe surface is drawn.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
)]
pub enum ViewMode {
    /// Textured, filled triangles.
    #[default]
    Normal,
    /// Triangle edges only.
    Wireframe,
    /// Vertices only.
    Points,
    /// Textured, darkened with a night tint.
    Night,
}

impl ViewMode {
    /// Cycle order used by the view-mode key and toolbar button.
    pub const ALL: [ViewMode; 4] =
        [Self::Normal, Self::Wireframe, Self::Points, Self::Night];

    /// The mode after this one, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Display name, matching the serialized form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Wireframe => "Wireframe",
            Self::Points => "Points",
            Self::Night => "Night",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Saved camera pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SavedPosition {
    /// Pitch in degrees.
    pub x: f32,
    /// Yaw in degrees.
    pub y: f32,
    /// Camera distance (negative, see `CameraOptions`).
    pub distance: f32,
}

impl Default for SavedPosition {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 180.0,
            distance: -5.0,
        }
    }
}

/// Flat, persisted view of the application state.
///
/// Every field has a default, so a file that names only some keys restores
/// those keys and leaves the rest at their defaults. Unknown keys are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigSnapshot {
    /// Window size in physical pixels.
    pub resolution: [u32; 2],
    /// Active layer name.
    pub texture: String,
    /// Whether idle auto-rotation is on.
    pub auto_rotate: bool,
    /// Pixel-to-degree drag scale.
    pub mouse_sensitivity: f32,
    /// Distance change per wheel notch.
    pub zoom_sensitivity: f32,
    /// Camera pose.
    pub last_position: SavedPosition,
    /// Surface drawing mode.
    pub view_mode: ViewMode,
    /// Procedural camera animation toggle.
    pub animation_enabled: bool,
    /// Sound toggle (persisted only; nothing is played).
    pub sound_enabled: bool,
    /// Surface lighting toggle.
    pub effects_enabled: bool,
    /// Atmosphere rim toggle.
    pub atmosphere_enabled: bool,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            resolution: [1280, 720],
            texture: "Default".to_owned(),
            auto_rotate: true,
            mouse_sensitivity: 0.2,
            zoom_sensitivity: 0.1,
            last_position: SavedPosition::default(),
            view_mode: ViewMode::Normal,
            animation_enabled: false,
            sound_enabled: true,
            effects_enabled: true,
            atmosphere_enabled: false,
        }
    }
}
