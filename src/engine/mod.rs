//! The engine: view, overlay and layer state, command dispatch, and the
//! frame loop that ties them to the renderer.

/// User-facing operations.
pub mod command;
mod dispatch;
mod frame;
mod persistence;

use web_time::Instant;

use self::command::GlobeCommand;
use crate::camera::{CameraAnimation, Projection, ViewController};
use crate::gpu::capture::ScreenshotWriter;
use crate::gpu::render_context::RenderContext;
use crate::mesh::MeshCache;
use crate::options::{ConfigStore, Options, ViewMode};
use crate::overlay::Overlay;
use crate::renderer::GlobeRenderer;
use crate::texture::TextureSet;
use crate::util::frame_timing::FrameTiming;

/// Device, surface, and pipelines. Absent in headless engines.
struct Gpu {
    context: RenderContext,
    renderer: GlobeRenderer,
}

/// Feature flags that are not owned by a sub-component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    /// Surface mode.
    pub view_mode: ViewMode,
    /// Lighting on the globe surface.
    pub effects: bool,
    /// Atmosphere shell.
    pub atmosphere: bool,
    /// Sound flag. Persisted and shown; nothing plays.
    pub sound: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Normal,
            effects: true,
            atmosphere: false,
            sound: true,
        }
    }
}

/// The globe viewer's state and, once attached, its GPU side.
///
/// # Frame loop
///
/// Feed input through [`execute`](Self::execute), then call
/// [`advance`](Self::advance) and [`render`](Self::render) once per frame.
/// [`resize`](Self::resize) follows the window size.
///
/// # Headless use
///
/// [`new`](Self::new) builds an engine with no GPU. Everything except
/// drawing and screenshots works, which is how the tests drive it.
pub struct GlobeEngine {
    options: Options,
    view: ViewController,
    animation: CameraAnimation,
    overlay: Overlay,
    /// Layer name to renderer texture index.
    layers: TextureSet<usize>,
    toggles: Toggles,
    projection: Projection,
    size: (u32, u32),
    meshes: MeshCache,
    store: Box<dyn ConfigStore>,
    screenshots: ScreenshotWriter,
    frame_timing: FrameTiming,
    stats: StatsCache,
    quit_requested: bool,
    gpu: Option<Gpu>,
}

/// Stats lines refreshed a few times a second.
#[derive(Debug, Default)]
struct StatsCache {
    lines: Vec<String>,
    since_refresh: f32,
}

/// Seconds between stats refreshes.
const STATS_INTERVAL: f32 = 0.25;

// ── Construction ─────────────────────────────────────────────────────────

impl GlobeEngine {
    /// Headless engine for a `size` window. Layers and the GPU are added
    /// later with [`attach_gpu`](Self::attach_gpu) or
    /// [`register_layers`](Self::register_layers).
    #[must_use]
    pub fn new(
        options: Options,
        store: Box<dyn ConfigStore>,
        screenshots: ScreenshotWriter,
        size: (u32, u32),
    ) -> Self {
        let (width, height) = (size.0.max(1), size.1.max(1));
        Self {
            view: ViewController::new(options.camera.clone()),
            animation: CameraAnimation::default(),
            overlay: Overlay::new(width, height),
            layers: TextureSet::new(),
            toggles: Toggles::default(),
            projection: Projection::new(&options.camera, width, height),
            size: (width, height),
            meshes: MeshCache::new(),
            store,
            screenshots,
            frame_timing: FrameTiming::new(options.display.target_fps),
            stats: StatsCache::default(),
            quit_requested: false,
            gpu: None,
            options,
        }
    }

    /// Register layer names without textures. The engine draws nothing,
    /// but layer selection behaves as with real textures.
    pub fn register_layers<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for (index, name) in names.into_iter().enumerate() {
            self.layers.insert(name, index);
        }
    }

    /// Take ownership of the device and surface, build the pipelines, and
    /// upload `images` as the layer set. The active layer is kept if the new
    /// set has one of the same name.
    pub fn attach_gpu(
        &mut self,
        context: RenderContext,
        images: TextureSet<image::RgbaImage>,
    ) {
        let mut renderer = GlobeRenderer::new(
            &context.device,
            &context.queue,
            context.format(),
            context.size(),
            &self.options.display,
        );
        let previous = self.layers.active_name().map(str::to_owned);
        self.layers = images.map(|name, img| {
            renderer.add_layer(&context.device, &context.queue, name, &img)
        });
        if let Some(name) = previous {
            let _ = self.layers.set_active(&name);
        }
        log::info!(
            "globe renderer ready with {} layer(s), active {:?}",
            self.layers.len(),
            self.layers.active_name()
        );
        self.size = context.size();
        self.overlay.resize(self.size.0, self.size.1);
        self.projection.resize(self.size.0, self.size.1);
        self.gpu = Some(Gpu { context, renderer });
    }
}

// ── Accessors ────────────────────────────────────────────────────────────

impl GlobeEngine {
    /// Camera controller.
    #[must_use]
    pub fn view(&self) -> &ViewController {
        &self.view
    }

    /// Camera animation.
    #[must_use]
    pub fn animation(&self) -> &CameraAnimation {
        &self.animation
    }

    /// Chrome state.
    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Layer selection.
    #[must_use]
    pub fn layers(&self) -> &TextureSet<usize> {
        &self.layers
    }

    /// Feature flags.
    #[must_use]
    pub fn toggles(&self) -> Toggles {
        self.toggles
    }

    /// Runtime constants.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current window size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Whether a quit command has been executed.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Whether a screenshot is waiting for the next frame.
    #[must_use]
    pub fn screenshot_pending(&self) -> bool {
        self.screenshots.is_pending()
    }

    /// When the next frame is due under the frame-rate cap.
    #[must_use]
    pub fn next_frame_at(&self) -> Instant {
        self.frame_timing.next_frame_at()
    }

    /// Whether the frame-rate cap allows drawing at `now`.
    #[must_use]
    pub fn frame_due(&self, now: Instant) -> bool {
        self.frame_timing.should_render(now)
    }

    /// Run `command` now. See [`execute_at`](Self::execute_at).
    pub fn execute(&mut self, command: GlobeCommand) {
        self.execute_at(command, Instant::now());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::TerraError;
    use crate::options::ConfigSnapshot;

    /// Shared in-memory store; clones see the same slot.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MemoryStore(Rc<RefCell<Option<ConfigSnapshot>>>);

    impl MemoryStore {
        pub(crate) fn saved(&self) -> Option<ConfigSnapshot> {
            self.0.borrow().clone()
        }
    }

    impl ConfigStore for MemoryStore {
        fn load(&self) -> Result<ConfigSnapshot, TerraError> {
            self.saved()
                .ok_or_else(|| TerraError::Config("nothing saved".to_owned()))
        }

        fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), TerraError> {
            *self.0.borrow_mut() = Some(snapshot.clone());
            Ok(())
        }
    }

    pub(crate) fn engine_with(store: Box<dyn ConfigStore>) -> GlobeEngine {
        let mut engine = GlobeEngine::new(
            Options::default(),
            store,
            ScreenshotWriter::new(std::env::temp_dir()),
            (1280, 720),
        );
        engine.register_layers(["Default", "Political", "Detailed"]);
        engine
    }

    pub(crate) fn engine(store: MemoryStore) -> GlobeEngine {
        engine_with(Box::new(store))
    }

    #[test]
    fn starts_idle_on_first_layer() {
        let e = engine(MemoryStore::default());
        assert_eq!(e.layers().active_name(), Some("Default"));
        assert_eq!(e.toggles(), Toggles::default());
        assert!(!e.quit_requested());
        assert!(!e.screenshot_pending());
        assert!(e.view().state().auto_rotate);
    }

    #[test]
    fn frame_cap_gates_redraws() {
        let mut e = engine(MemoryStore::default());
        let t0 = Instant::now();
        let _ = e.advance(t0);
        assert!(!e.frame_due(t0 + std::time::Duration::from_millis(5)));
        assert!(e.frame_due(t0 + std::time::Duration::from_millis(17)));
        assert!(e.next_frame_at() > t0);
    }

    #[test]
    fn zero_size_is_clamped() {
        let e = GlobeEngine::new(
            Options::default(),
            Box::new(MemoryStore::default()),
            ScreenshotWriter::new("."),
            (0, 0),
        );
        assert_eq!(e.size(), (1, 1));
    }
}
