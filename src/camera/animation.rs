use std::fmt;

use super::controller::ViewController;

/// Procedural camera path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationKind {
    /// Steady spin about the vertical axis.
    #[default]
    Rotation,
    /// Spin while the pitch swings ±30°.
    Orbit,
    /// Distance breathes around the initial zoom.
    Zoom,
    /// Wide pitch sweep with a slow zoom pulse.
    Flyby,
}

impl AnimationKind {
    /// All kinds in cycle order.
    pub const ALL: [AnimationKind; 4] =
        [Self::Rotation, Self::Orbit, Self::Zoom, Self::Flyby];

    /// The kind after this one, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rotation => "Rotation",
            Self::Orbit => "Orbit",
            Self::Zoom => "Zoom",
            Self::Flyby => "Flyby",
        })
    }
}

/// Time-driven camera motion layered on top of the controller.
///
/// Every write goes through [`ViewController`] setters, so the pitch and
/// zoom clamps still hold.
#[derive(Debug, Clone)]
pub struct CameraAnimation {
    /// Whether the animation runs.
    pub enabled: bool,
    /// Active path.
    pub kind: AnimationKind,
    /// Yaw speed multiplier, degrees per 60 Hz step.
    pub speed: f32,
    time: f32,
}

impl Default for CameraAnimation {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: AnimationKind::Rotation,
            speed: 1.0,
            time: 0.0,
        }
    }
}

impl CameraAnimation {
    /// Seconds accumulated while enabled.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Flip `enabled`, restarting the clock when turned on.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if self.enabled {
            self.time = 0.0;
        }
        self.enabled
    }

    /// Advance by `dt` seconds and move the camera. Does nothing while
    /// disabled or while the user is dragging.
    pub fn update(&mut self, dt: f32, view: &mut ViewController) {
        if !self.enabled || view.is_dragging() {
            return;
        }
        self.time += dt.max(0.0);
        let steps = dt.max(0.0) * 60.0;
        let t = self.time;
        let base = view.options().initial_distance;
        let spin = self.speed * steps;

        match self.kind {
            AnimationKind::Rotation => view.add_yaw(spin * 0.5),
            AnimationKind::Orbit => {
                view.set_pitch(t.sin() * 30.0);
                view.add_yaw(spin * 0.3);
            }
            AnimationKind::Zoom => {
                view.set_distance(base + (t * 0.5).sin() * 2.0);
            }
            AnimationKind::Flyby => {
                view.set_pitch((t * 0.3).sin() * 45.0);
                view.add_yaw(spin * 0.4);
                view.set_distance(base + (t * 0.2).sin() * 3.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;
    use crate::camera::controller::PITCH_LIMIT;

    #[test]
    fn disabled_animation_leaves_view_alone() {
        let mut anim = CameraAnimation::default();
        let mut view = ViewController::default();
        let before = *view.state();
        anim.update(0.5, &mut view);
        assert_eq!(*view.state(), before);
        assert_eq!(anim.time(), 0.0);
    }

    #[test]
    fn rotation_spins_half_speed() {
        let mut anim = CameraAnimation::default();
        let _ = anim.toggle();
        let mut view = ViewController::default();
        anim.update(1.0 / 60.0, &mut view);
        assert!((view.state().rotation_y - 180.5).abs() < 1e-4);
    }

    #[test]
    fn orbit_returns_to_level_after_a_period() {
        let mut anim = CameraAnimation {
            kind: AnimationKind::Orbit,
            ..CameraAnimation::default()
        };
        let _ = anim.toggle();
        let mut view = ViewController::default();
        anim.update(TAU, &mut view);
        assert!(view.state().rotation_x.abs() < 1e-3);
    }

    #[test]
    fn every_kind_respects_clamps() {
        for kind in AnimationKind::ALL {
            let mut anim = CameraAnimation {
                kind,
                speed: 50.0,
                ..CameraAnimation::default()
            };
            let _ = anim.toggle();
            let mut view = ViewController::default();
            for _ in 0..2000 {
                anim.update(0.05, &mut view);
                let s = view.state();
                assert!(s.rotation_x.abs() <= PITCH_LIMIT, "{kind}");
                assert!((-15.0..=-2.0).contains(&s.distance), "{kind}");
            }
        }
    }

    #[test]
    fn kind_cycle_wraps() {
        let mut kind = AnimationKind::Flyby;
        kind = kind.next();
        assert_eq!(kind, AnimationKind::Rotation);
    }
}
