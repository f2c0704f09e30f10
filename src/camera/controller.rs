//! Damped rotation/zoom controller for the globe.
//!
//! Pointer drags rotate the globe directly; releasing the pointer leaves a
//! residual velocity that decays geometrically. While idle the globe can
//! auto-rotate about its vertical axis. All decay and auto-rotate
//! increments are expressed per 60 Hz step and scaled by the elapsed time,
//! so the motion is the same at any frame rate.

use std::time::Duration;

use glam::{Mat4, Vec2, Vec3};
use web_time::Instant;

use crate::options::{CameraOptions, SavedPosition};

/// Pitch limit in degrees, both directions.
pub const PITCH_LIMIT: f32 = 85.0;

/// Length of one reference step in seconds.
const REFERENCE_STEP: f32 = 1.0 / 60.0;

/// Rotation and zoom of the globe camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Pitch in degrees, within `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub rotation_x: f32,
    /// Yaw in degrees, unbounded.
    pub rotation_y: f32,
    /// Camera translation along Z; negative, within
    /// `[min_zoom, max_zoom]`.
    pub distance: f32,
    /// Residual rotation per step, `(pitch, yaw)` in degrees.
    pub velocity: Vec2,
    /// Whether the globe spins on its own while idle.
    pub auto_rotate: bool,
}

/// Transient pointer tracking between press and release.
#[derive(Debug, Clone, Copy, Default)]
struct PointerDragState {
    last_position: Option<Vec2>,
    last_delta: Vec2,
    last_click: Option<Instant>,
}

/// Owns the [`ViewState`] and applies pointer, wheel, and time input to it.
#[derive(Debug, Clone)]
pub struct ViewController {
    state: ViewState,
    drag: PointerDragState,
    opts: CameraOptions,
}

impl ViewController {
    /// Create a controller at the initial pose with auto-rotate on.
    #[must_use]
    pub fn new(opts: CameraOptions) -> Self {
        let state = ViewState {
            rotation_x: opts.initial_rotation_x,
            rotation_y: opts.initial_rotation_y,
            distance: opts.initial_distance,
            velocity: Vec2::ZERO,
            auto_rotate: true,
        };
        Self {
            state,
            drag: PointerDragState::default(),
            opts,
        }
    }

    /// Current view state.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Tuning parameters.
    #[must_use]
    pub fn options(&self) -> &CameraOptions {
        &self.opts
    }

    /// Replace the drag and wheel sensitivities.
    pub fn set_sensitivity(&mut self, mouse: f32, zoom: f32) {
        self.opts.mouse_sensitivity = mouse;
        self.opts.zoom_sensitivity = zoom;
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.last_position.is_some()
    }

    /// Rotation scale for the current zoom: `min_rotation_speed` at the
    /// closest distance rising linearly to `base_rotation_speed` at the
    /// farthest.
    #[must_use]
    pub fn rotation_speed_factor(&self) -> f32 {
        let o = &self.opts;
        let span = o.min_zoom - o.max_zoom;
        let t = if span.abs() > f32::EPSILON {
            ((self.state.distance - o.max_zoom) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        o.min_rotation_speed + (o.base_rotation_speed - o.min_rotation_speed) * t
    }

    /// Primary button pressed at `pos`.
    ///
    /// A press within the double-click window of the previous one resets
    /// the view instead of starting a drag. Either way the residual
    /// velocity is cleared.
    pub fn begin_drag(&mut self, pos: Vec2, now: Instant) {
        let window = Duration::from_millis(self.opts.double_click_ms);
        let double = self
            .drag
            .last_click
            .is_some_and(|t| now.saturating_duration_since(t) < window);
        self.drag.last_click = Some(now);
        self.drag.last_delta = Vec2::ZERO;

        if double {
            log::debug!("double click, resetting view");
            self.drag.last_position = None;
            self.reset_view();
        } else {
            self.drag.last_position = Some(pos);
            self.state.auto_rotate = false;
        }
        self.state.velocity = Vec2::ZERO;
    }

    /// Pointer moved to `pos`. Ignored unless a drag is in progress.
    pub fn drag_to(&mut self, pos: Vec2) {
        let Some(last) = self.drag.last_position else {
            return;
        };
        let raw = pos - last;
        let delta =
            raw * self.opts.mouse_sensitivity * self.rotation_speed_factor();
        self.state.rotation_y += delta.x;
        self.state.rotation_x =
            clamp_pitch(self.state.rotation_x + delta.y);
        if raw != Vec2::ZERO {
            self.drag.last_delta = raw;
        }
        self.drag.last_position = Some(pos);
    }

    /// Primary button released at `pos`. Seeds the residual velocity from
    /// the last pointer movement and ends the drag.
    pub fn end_drag(&mut self, pos: Vec2) {
        let Some(last) = self.drag.last_position.take() else {
            return;
        };
        let raw = pos - last;
        let raw = if raw == Vec2::ZERO {
            self.drag.last_delta
        } else {
            raw
        };
        let d = raw * self.opts.mouse_sensitivity;
        self.state.velocity =
            Vec2::new(d.y, d.x) * self.opts.release_scale;
        self.drag.last_delta = Vec2::ZERO;
    }

    /// Advance by `dt` seconds: auto-rotate when idle, apply and decay the
    /// residual velocity.
    pub fn tick(&mut self, dt: f32) {
        let steps = (dt.max(0.0)) / REFERENCE_STEP;
        if !self.is_dragging() && self.state.auto_rotate {
            self.state.rotation_y += self.opts.auto_rotate_speed * steps;
        }
        // Closed-form sum of `steps` geometric steps, so one long frame
        // travels as far as several short ones.
        let m = self.opts.momentum;
        let decay = m.powf(steps);
        let travel = if (1.0 - m).abs() > f32::EPSILON {
            (1.0 - decay) / (1.0 - m)
        } else {
            steps
        };
        self.state.rotation_x += self.state.velocity.x * travel;
        self.state.rotation_y += self.state.velocity.y * travel;
        self.state.velocity *= decay;
        if self.state.velocity.length_squared() < 1e-12 {
            self.state.velocity = Vec2::ZERO;
        }
        self.state.rotation_x = clamp_pitch(self.state.rotation_x);
    }

    /// Move the camera by `delta * zoom_sensitivity`. Positive deltas move
    /// closer. A change that would leave the zoom range is dropped whole.
    ///
    /// The cursor is accepted but zoom is uniform about the globe centre.
    pub fn zoom(&mut self, delta: f32, _cursor: Vec2) {
        let next = self.state.distance + delta * self.opts.zoom_sensitivity;
        if (self.opts.min_zoom..=self.opts.max_zoom).contains(&next) {
            self.state.distance = next;
        }
    }

    /// Return to the initial pose with auto-rotate on.
    pub fn reset_view(&mut self) {
        self.state.rotation_x = self.opts.initial_rotation_x;
        self.state.rotation_y = self.opts.initial_rotation_y;
        self.state.distance = self.opts.initial_distance;
        self.state.velocity = Vec2::ZERO;
        self.state.auto_rotate = true;
    }

    /// Flip auto-rotate.
    pub fn toggle_auto_rotate(&mut self) {
        self.state.auto_rotate = !self.state.auto_rotate;
    }

    /// Set auto-rotate explicitly.
    pub fn set_auto_rotate(&mut self, on: bool) {
        self.state.auto_rotate = on;
    }

    /// Place the camera, clamping pitch and distance into range.
    pub fn set_view(&mut self, rotation_x: f32, rotation_y: f32, distance: f32) {
        self.state.rotation_x = clamp_pitch(rotation_x);
        self.state.rotation_y = rotation_y;
        self.state.distance = self.clamp_distance(distance);
    }

    /// Add to the yaw.
    pub fn add_yaw(&mut self, degrees: f32) {
        self.state.rotation_y += degrees;
    }

    /// Set the pitch, clamped.
    pub fn set_pitch(&mut self, degrees: f32) {
        self.state.rotation_x = clamp_pitch(degrees);
    }

    /// Set the distance, clamped into the zoom range.
    pub fn set_distance(&mut self, distance: f32) {
        self.state.distance = self.clamp_distance(distance);
    }

    /// Snapshot of the pose for persistence.
    #[must_use]
    pub fn saved_position(&self) -> SavedPosition {
        SavedPosition {
            x: self.state.rotation_x,
            y: self.state.rotation_y,
            distance: self.state.distance,
        }
    }

    /// `translate(0, 0, distance) * rot_x(pitch) * rot_y(yaw)`.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, self.state.distance))
            * Mat4::from_rotation_x(self.state.rotation_x.to_radians())
            * Mat4::from_rotation_y(self.state.rotation_y.to_radians())
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        if distance.is_finite() {
            distance.clamp(self.opts.min_zoom, self.opts.max_zoom)
        } else {
            self.opts.initial_distance
        }
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(CameraOptions::default())
    }
}

fn clamp_pitch(degrees: f32) -> f32 {
    if degrees.is_finite() {
        degrees.clamp(-PITCH_LIMIT, PITCH_LIMIT)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn drag(ctrl: &mut ViewController, from: Vec2, to: Vec2, now: Instant) {
        ctrl.begin_drag(from, now);
        ctrl.drag_to(to);
    }

    #[test]
    fn initial_pose() {
        let ctrl = ViewController::default();
        let s = ctrl.state();
        assert_eq!(s.rotation_x, 0.0);
        assert_eq!(s.rotation_y, 180.0);
        assert_eq!(s.distance, -5.0);
        assert!(s.auto_rotate);
    }

    #[test]
    fn zoom_in_by_one_notch() {
        let mut ctrl = ViewController::default();
        ctrl.zoom(1.0, Vec2::ZERO);
        assert!((ctrl.state().distance - -4.9).abs() < 1e-5);
        ctrl.zoom(-2.0, Vec2::ZERO);
        assert!((ctrl.state().distance - -5.1).abs() < 1e-5);
    }

    #[test]
    fn zoom_out_of_range_is_dropped() {
        let mut ctrl = ViewController::default();
        ctrl.set_distance(-2.05);
        ctrl.zoom(1.0, Vec2::ZERO);
        assert!((ctrl.state().distance - -2.05).abs() < 1e-6);

        ctrl.set_distance(-14.95);
        ctrl.zoom(-1.0, Vec2::ZERO);
        assert!((ctrl.state().distance - -14.95).abs() < 1e-6);
    }

    #[test]
    fn zoom_stays_in_range_under_many_notches() {
        let mut ctrl = ViewController::default();
        for i in 0..500 {
            let delta = if i % 7 < 4 { 3.0 } else { -5.0 };
            ctrl.zoom(delta, Vec2::new(10.0, 10.0));
            let d = ctrl.state().distance;
            assert!((-15.0..=-2.0).contains(&d), "distance {d}");
        }
    }

    #[test]
    fn pitch_clamped_during_drag() {
        let mut ctrl = ViewController::default();
        let now = Instant::now();
        drag(&mut ctrl, Vec2::ZERO, Vec2::new(0.0, 100_000.0), now);
        assert_eq!(ctrl.state().rotation_x, PITCH_LIMIT);
        ctrl.drag_to(Vec2::new(0.0, -300_000.0));
        assert_eq!(ctrl.state().rotation_x, -PITCH_LIMIT);
    }

    #[test]
    fn drag_rotates_and_disables_auto_rotate() {
        let mut ctrl = ViewController::default();
        let now = Instant::now();
        drag(&mut ctrl, Vec2::ZERO, Vec2::new(10.0, 0.0), now);
        assert!(ctrl.is_dragging());
        assert!(!ctrl.state().auto_rotate);
        // distance -5 sits 3/13 of the way from closest to farthest
        let factor = 0.05 + 0.15 * (3.0 / 13.0);
        let expected = 180.0 + 10.0 * 0.2 * factor;
        assert!((ctrl.state().rotation_y - expected).abs() < 1e-4);
    }

    #[test]
    fn rotation_factor_slower_when_closer() {
        let mut ctrl = ViewController::default();
        ctrl.set_distance(-2.0);
        let near = ctrl.rotation_speed_factor();
        ctrl.set_distance(-15.0);
        let far = ctrl.rotation_speed_factor();
        assert!((near - 0.05).abs() < 1e-6);
        assert!((far - 0.2).abs() < 1e-6);
    }

    #[test]
    fn drag_to_without_press_is_ignored() {
        let mut ctrl = ViewController::default();
        ctrl.drag_to(Vec2::new(50.0, 50.0));
        assert_eq!(ctrl.state().rotation_y, 180.0);
        assert!(!ctrl.is_dragging());
    }

    #[test]
    fn release_seeds_velocity_from_final_delta() {
        let mut ctrl = ViewController::default();
        let now = Instant::now();
        drag(&mut ctrl, Vec2::ZERO, Vec2::new(10.0, 5.0), now);
        ctrl.end_drag(Vec2::new(20.0, 10.0));
        let v = ctrl.state().velocity;
        // (dy, dx) * sensitivity * release scale
        assert!((v.x - 5.0 * 0.2 * 0.1).abs() < 1e-6);
        assert!((v.y - 10.0 * 0.2 * 0.1).abs() < 1e-6);
        assert!(!ctrl.is_dragging());
    }

    #[test]
    fn release_at_last_position_uses_last_motion() {
        let mut ctrl = ViewController::default();
        let now = Instant::now();
        drag(&mut ctrl, Vec2::ZERO, Vec2::new(4.0, 0.0), now);
        ctrl.end_drag(Vec2::new(4.0, 0.0));
        assert!(ctrl.state().velocity.y > 0.0);
    }

    #[test]
    fn momentum_decays_monotonically_without_auto_rotate() {
        let mut ctrl = ViewController::default();
        let now = Instant::now();
        drag(&mut ctrl, Vec2::ZERO, Vec2::new(30.0, 20.0), now);
        ctrl.end_drag(Vec2::new(60.0, 40.0));

        let mut prev = ctrl.state().velocity;
        assert!(prev.x > 0.0 && prev.y > 0.0);
        for _ in 0..2000 {
            ctrl.tick(FRAME);
            let v = ctrl.state().velocity;
            if prev != Vec2::ZERO {
                assert!(v.x.abs() < prev.x.abs() || v.x == 0.0);
                assert!(v.y.abs() < prev.y.abs() || v.y == 0.0);
            }
            prev = v;
        }
        assert_eq!(ctrl.state().velocity, Vec2::ZERO);
        assert!(!ctrl.state().auto_rotate);
    }

    #[test]
    fn decay_is_frame_rate_independent() {
        let mut a = ViewController::default();
        let mut b = ViewController::default();
        for ctrl in [&mut a, &mut b] {
            ctrl.begin_drag(Vec2::ZERO, Instant::now());
            ctrl.end_drag(Vec2::new(50.0, 0.0));
        }
        for _ in 0..60 {
            a.tick(FRAME);
        }
        for _ in 0..30 {
            b.tick(2.0 * FRAME);
        }
        assert!((a.state().velocity.y - b.state().velocity.y).abs() < 1e-5);
        assert!((a.state().rotation_y - b.state().rotation_y).abs() < 1e-3);
    }

    #[test]
    fn auto_rotate_advances_yaw_when_idle() {
        let mut ctrl = ViewController::default();
        ctrl.tick(FRAME);
        assert!((ctrl.state().rotation_y - 180.1).abs() < 1e-4);
        ctrl.toggle_auto_rotate();
        ctrl.tick(FRAME);
        assert!((ctrl.state().rotation_y - 180.1).abs() < 1e-4);
    }

    #[test]
    fn double_click_resets_view() {
        let mut ctrl = ViewController::default();
        let t0 = Instant::now();
        drag(&mut ctrl, Vec2::ZERO, Vec2::new(200.0, 200.0), t0);
        ctrl.end_drag(Vec2::new(200.0, 200.0));
        ctrl.zoom(10.0, Vec2::ZERO);
        ctrl.begin_drag(Vec2::ZERO, t0 + Duration::from_millis(120));
        let s = ctrl.state();
        assert_eq!(s.rotation_x, 0.0);
        assert_eq!(s.rotation_y, 180.0);
        assert_eq!(s.distance, -5.0);
        assert_eq!(s.velocity, Vec2::ZERO);
        assert!(s.auto_rotate);
        assert!(!ctrl.is_dragging());
    }

    #[test]
    fn slow_second_click_starts_a_drag() {
        let mut ctrl = ViewController::default();
        let t0 = Instant::now();
        ctrl.begin_drag(Vec2::ZERO, t0);
        ctrl.end_drag(Vec2::ZERO);
        ctrl.begin_drag(Vec2::ZERO, t0 + Duration::from_millis(400));
        assert!(ctrl.is_dragging());
        assert!(!ctrl.state().auto_rotate);
    }

    #[test]
    fn press_clears_velocity() {
        let mut ctrl = ViewController::default();
        let t0 = Instant::now();
        drag(&mut ctrl, Vec2::ZERO, Vec2::new(30.0, 0.0), t0);
        ctrl.end_drag(Vec2::new(60.0, 0.0));
        assert!(ctrl.state().velocity.y != 0.0);
        ctrl.begin_drag(Vec2::ZERO, t0 + Duration::from_secs(1));
        assert_eq!(ctrl.state().velocity, Vec2::ZERO);
    }

    #[test]
    fn set_view_clamps() {
        let mut ctrl = ViewController::default();
        ctrl.set_view(120.0, 720.0, -40.0);
        let s = ctrl.state();
        assert_eq!(s.rotation_x, PITCH_LIMIT);
        assert_eq!(s.rotation_y, 720.0);
        assert_eq!(s.distance, -15.0);
        ctrl.set_view(f32::NAN, 0.0, f32::INFINITY);
        assert_eq!(ctrl.state().rotation_x, 0.0);
        assert_eq!(ctrl.state().distance, -5.0);
    }

    #[test]
    fn view_matrix_places_origin_at_distance() {
        let ctrl = ViewController::default();
        let origin = ctrl.view_matrix().transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }
}
