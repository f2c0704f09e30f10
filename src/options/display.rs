use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Globe geometry and frame pacing.
pub struct DisplayOptions {
    /// Sphere radius in world units.
    pub globe_radius: f32,
    /// Latitude/longitude band count.
    pub segments: u32,
    /// Atmosphere shell radius relative to the globe.
    pub atmosphere_scale: f32,
    /// Frame rate cap.
    pub target_fps: u32,
    /// Background colour, linear RGB.
    pub clear_color: [f32; 3],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            globe_radius: 2.0,
            segments: 32,
            atmosphere_scale: 1.05,
            target_fps: 60,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}
