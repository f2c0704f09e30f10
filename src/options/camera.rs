use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Projection, zoom range, and drag/momentum tuning for the globe camera.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Pixel-to-degree scale for drags.
    pub mouse_sensitivity: f32,
    /// Distance change per wheel notch.
    pub zoom_sensitivity: f32,
    /// Farthest allowed distance (most negative).
    pub min_zoom: f32,
    /// Closest allowed distance (least negative).
    pub max_zoom: f32,
    /// Per-step velocity retention after a drag is released.
    pub momentum: f32,
    /// Degrees added to the yaw each 60 Hz step while auto-rotating.
    pub auto_rotate_speed: f32,
    /// Drag rotation factor at the farthest zoom.
    pub base_rotation_speed: f32,
    /// Drag rotation factor at the closest zoom.
    pub min_rotation_speed: f32,
    /// Scale applied to the final drag delta to seed momentum.
    pub release_scale: f32,
    /// Presses closer together than this many milliseconds reset the view.
    pub double_click_ms: u64,
    /// Pitch after a reset, degrees.
    pub initial_rotation_x: f32,
    /// Yaw after a reset, degrees.
    pub initial_rotation_y: f32,
    /// Distance after a reset.
    pub initial_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.1,
            zfar: 50.0,
            mouse_sensitivity: 0.2,
            zoom_sensitivity: 0.1,
            min_zoom: -15.0,
            max_zoom: -2.0,
            momentum: 0.92,
            auto_rotate_speed: 0.1,
            base_rotation_speed: 0.2,
            min_rotation_speed: 0.05,
            release_scale: 0.1,
            double_click_ms: 300,
            initial_rotation_x: 0.0,
            initial_rotation_y: 180.0,
            initial_distance: -5.0,
        }
    }
}
