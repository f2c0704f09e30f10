use glam::Mat4;

use crate::options::CameraOptions;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Projection {
    /// Build from camera options for a `width` x `height` viewport.
    #[must_use]
    pub fn new(opts: &CameraOptions, width: u32, height: u32) -> Self {
        let mut proj = Self {
            aspect: 1.0,
            fovy: opts.fovy,
            znear: opts.znear,
            zfar: opts.zfar,
        };
        proj.resize(width, height);
        proj
    }

    /// Update the aspect ratio. Zero-sized viewports keep the old ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Projection matrix. `perspective_rh` already maps depth to [0, 1],
    /// which is what wgpu expects.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_maps_near_and_far_to_unit_range() {
        let proj = Projection::new(&CameraOptions::default(), 1280, 720);
        let m = proj.matrix();
        let near = m.project_point3(glam::Vec3::new(0.0, 0.0, -0.1));
        let far = m.project_point3(glam::Vec3::new(0.0, 0.0, -50.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_resize_keeps_aspect() {
        let mut proj = Projection::new(&CameraOptions::default(), 1280, 720);
        proj.resize(0, 720);
        assert!((proj.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }
}
