use web_time::{Duration, Instant};

/// Longest step handed to the simulation, so a stall (window drag, debugger)
/// does not fling the globe.
const MAX_STEP: f32 = 0.1;

/// Frame pacing, per-frame delta, and a smoothed FPS readout.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Minimum frame duration based on the target FPS.
    min_frame_duration: Duration,
    last_frame: Instant,
    /// Exponential moving average of the instantaneous rate.
    smoothed_fps: f32,
    /// Weight of each new sample (0.0-1.0).
    smoothing: f32,
}

impl FrameTiming {
    /// Create a timer capped at `target_fps` (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(target_fps, Instant::now())
    }

    /// As [`new`](Self::new), with an explicit start instant.
    #[must_use]
    pub fn starting_at(target_fps: u32, now: Instant) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };
        Self {
            min_frame_duration,
            last_frame: now,
            smoothed_fps: target_fps.max(1) as f32,
            smoothing: 0.05,
        }
    }

    /// When the next frame is due.
    #[must_use]
    pub fn next_frame_at(&self) -> Instant {
        self.last_frame + self.min_frame_duration
    }

    /// Whether enough time has passed since the last frame.
    #[must_use]
    pub fn should_render(&self, now: Instant) -> bool {
        now >= self.next_frame_at()
    }

    /// Mark a frame at `now` and return its step in seconds, capped.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        frame_time.min(MAX_STEP)
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paces_to_target() {
        let t0 = Instant::now();
        let timing = FrameTiming::starting_at(60, t0);
        assert!(!timing.should_render(t0 + Duration::from_millis(10)));
        assert!(timing.should_render(t0 + Duration::from_millis(17)));
    }

    #[test]
    fn unlimited_always_renders() {
        let t0 = Instant::now();
        let timing = FrameTiming::starting_at(0, t0);
        assert!(timing.should_render(t0));
    }

    #[test]
    fn tick_returns_capped_step() {
        let t0 = Instant::now();
        let mut timing = FrameTiming::starting_at(60, t0);
        let dt = timing.tick(t0 + Duration::from_millis(20));
        assert!((dt - 0.02).abs() < 1e-6);
        let dt = timing.tick(t0 + Duration::from_secs(5));
        assert_eq!(dt, MAX_STEP);
    }

    #[test]
    fn fps_converges() {
        let t0 = Instant::now();
        let mut timing = FrameTiming::starting_at(60, t0);
        for i in 1..=400 {
            let _ = timing.tick(t0 + Duration::from_millis(i * 33));
        }
        assert!((timing.fps() - 30.3).abs() < 0.5);
    }
}
