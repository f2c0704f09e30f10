//! Per-frame work: simulation step, stats, drawing, and screenshots.

use web_time::Instant;

use super::{GlobeEngine, Gpu, STATS_INTERVAL};
use crate::error::TerraError;
use crate::gpu::capture::{read_texture_pixels, to_rgba, ScreenshotWriter};
use crate::gpu::texture::RenderTarget;
use crate::overlay::OverlayStatus;
use crate::renderer::globe::GlobeFrame;
use crate::renderer::FrameInputs;

// ── Simulation ───────────────────────────────────────────────────────────

impl GlobeEngine {
    /// Mark a frame at `now` and step the simulation by the elapsed time.
    /// Returns the step in seconds.
    pub fn advance(&mut self, now: Instant) -> f32 {
        let dt = self.frame_timing.tick(now);
        self.update(dt);
        dt
    }

    /// Step everything time-driven by `dt` seconds: camera momentum and
    /// auto-rotate, animation, panel easing, and the stats readout.
    pub fn update(&mut self, dt: f32) {
        self.view.tick(dt);
        self.animation.update(dt, &mut self.view);
        self.overlay.update(dt);

        self.stats.since_refresh += dt;
        if self.stats.since_refresh >= STATS_INTERVAL {
            self.refresh_stats();
        }
    }

    pub(super) fn refresh_stats(&mut self) {
        self.stats.lines = self.stats_lines(self.frame_timing.fps());
        self.stats.since_refresh = 0.0;
    }

    /// Stats readout for a given frame rate.
    #[must_use]
    pub fn stats_lines(&self, fps: f32) -> Vec<String> {
        let on_off = |b: bool| if b { "on" } else { "off" };
        let s = self.view.state();
        vec![
            format!("FPS: {fps:.0}"),
            format!("View mode: {}", self.toggles.view_mode),
            format!(
                "Animation: {} ({})",
                on_off(self.animation.enabled),
                self.animation.kind
            ),
            format!("Effects: {}", on_off(self.toggles.effects)),
            format!("Atmosphere: {}", on_off(self.toggles.atmosphere)),
            format!("Rotation: {:.1}, {:.1}", s.rotation_x, s.rotation_y),
            format!("Zoom: {:.2}", s.distance),
        ]
    }

    /// Values the overlay draws that live outside it.
    #[must_use]
    pub fn overlay_status(&self) -> OverlayStatus {
        OverlayStatus {
            resolution: [self.size.0, self.size.1],
            layer: self.layers.active_name().unwrap_or("none").to_owned(),
            view_mode: self.toggles.view_mode,
            auto_rotate: self.view.state().auto_rotate,
            animation: self.animation.enabled,
            effects: self.toggles.effects,
            atmosphere: self.toggles.atmosphere,
            sound: self.toggles.sound,
            stats: if self.overlay.stats_visible() {
                self.stats.lines.clone()
            } else {
                Vec::new()
            },
        }
    }

    /// Window title: the app name, followed by the frame rate and view mode
    /// while stats are shown. Changes at most at the stats refresh rate.
    #[must_use]
    pub fn window_title(&self) -> String {
        match self.stats.lines.first() {
            Some(fps) if self.overlay.stats_visible() => {
                format!("Terra | {fps} | {}", self.toggles.view_mode)
            }
            _ => "Terra".to_owned(),
        }
    }

    /// Follow a window resize. Zero sizes (minimised) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.overlay.resize(width, height);
        self.projection.resize(width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.context.resize(width, height);
        }
    }

    fn globe_frame(&self) -> GlobeFrame {
        GlobeFrame {
            view: self.view.view_matrix(),
            proj: self.projection.matrix(),
            view_mode: self.toggles.view_mode,
            effects: self.toggles.effects,
            atmosphere: self.toggles.atmosphere,
        }
    }
}

// ── Drawing ──────────────────────────────────────────────────────────────

impl GlobeEngine {
    /// Draw and present one frame. A pending screenshot is rendered off
    /// screen afterwards; its failure is logged, not returned.
    ///
    /// Does nothing on a headless engine.
    ///
    /// # Errors
    ///
    /// Returns the surface error if no frame could be acquired. `Outdated`
    /// and `Lost` are fixed by calling [`resize`](Self::resize).
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let quads = self.overlay.quads(&self.overlay_status());
        let inputs = FrameInputs {
            globe: self.globe_frame(),
            layer: self.layers.active().copied(),
            quads: &quads,
        };
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };
        gpu.renderer.sync_mesh(
            &gpu.context.device,
            &mut self.meshes,
            &self.options.display,
        );

        let output = gpu.context.get_next_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu.context.create_encoder("Frame Encoder");
        gpu.renderer.render(
            &gpu.context.device,
            &gpu.context.queue,
            &mut encoder,
            &view,
            gpu.context.size(),
            &inputs,
        );
        gpu.context.submit(encoder);
        output.present();

        if self.screenshots.take_request() {
            if let Err(e) = capture(gpu, &inputs, &mut self.screenshots) {
                log::error!("screenshot failed: {e}");
            }
        }
        Ok(())
    }
}

/// Render `inputs` into an off-screen target and save it as a PNG.
fn capture(
    gpu: &mut Gpu,
    inputs: &FrameInputs<'_>,
    writer: &mut ScreenshotWriter,
) -> Result<(), TerraError> {
    let (width, height) = gpu.context.size();
    let format = gpu.context.format();
    let target = RenderTarget::new(&gpu.context.device, width, height, format);
    let mut encoder = gpu.context.create_encoder("Screenshot Encoder");
    gpu.renderer.render(
        &gpu.context.device,
        &gpu.context.queue,
        &mut encoder,
        &target.view,
        (width, height),
        inputs,
    );
    gpu.context.submit(encoder);

    let mut pixels = read_texture_pixels(
        &gpu.context.device,
        &gpu.context.queue,
        &target.texture,
        width,
        height,
    )?;
    to_rgba(&mut pixels, format);
    let _ = writer.save(pixels, width, height)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::command::GlobeCommand;
    use crate::engine::tests::{engine, MemoryStore};

    #[test]
    fn update_eases_panel_and_spins() {
        let mut e = engine(MemoryStore::default());
        e.execute(GlobeCommand::ToggleMenu);
        e.update(1.0 / 60.0);
        assert!(e.overlay().panel().current_offset < 1280.0);
        assert!(e.view().state().rotation_y > 180.0);
    }

    #[test]
    fn animation_respects_clamps() {
        let mut e = engine(MemoryStore::default());
        e.execute(GlobeCommand::ToggleAnimation);
        e.execute(GlobeCommand::CycleAnimationKind);
        e.execute(GlobeCommand::CycleAnimationKind);
        e.execute(GlobeCommand::CycleAnimationKind);
        for _ in 0..3000 {
            e.update(1.0 / 30.0);
            let s = e.view().state();
            assert!((-85.0..=85.0).contains(&s.rotation_x));
            assert!((-15.0..=-2.0).contains(&s.distance));
        }
    }

    #[test]
    fn stats_refresh_and_title() {
        let mut e = engine(MemoryStore::default());
        assert_eq!(e.window_title(), "Terra");
        e.execute(GlobeCommand::ToggleStats);
        assert!(e.window_title().starts_with("Terra | FPS:"));
        let status = e.overlay_status();
        assert_eq!(status.stats.len(), 7);
        assert!(status.stats[1].ends_with("Normal"));
        e.execute(GlobeCommand::CycleViewMode);
        // Not refreshed until the interval passes.
        assert!(e.overlay_status().stats[1].ends_with("Normal"));
        e.update(0.3);
        assert!(e.overlay_status().stats[1].ends_with("Wireframe"));
    }

    #[test]
    fn status_carries_layer() {
        let mut e = engine(MemoryStore::default());
        e.execute(GlobeCommand::CycleLayer);
        assert_eq!(e.overlay_status().layer, "Political");
        assert!(e.overlay_status().stats.is_empty());
    }

    #[test]
    fn resize_ignores_zero() {
        let mut e = engine(MemoryStore::default());
        e.resize(0, 0);
        assert_eq!(e.size(), (1280, 720));
        e.resize(800, 600);
        assert_eq!(e.size(), (800, 600));
        assert_eq!(e.snapshot().resolution, [800, 600]);
    }

    #[test]
    fn headless_render_is_noop() {
        let mut e = engine(MemoryStore::default());
        e.execute(GlobeCommand::Screenshot);
        assert!(e.render().is_ok());
        assert!(e.screenshot_pending());
    }
}
