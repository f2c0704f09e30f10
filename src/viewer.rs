//! Standalone globe window backed by winit.
//!
//! ```no_run
//! # use terra::Viewer;
//! Viewer::builder()
//!     .with_assets("assets")
//!     .with_config("terra_config.json")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    error::TerraError,
    gpu::{capture::ScreenshotWriter, render_context::RenderContext},
    options::{load_or_default, ConfigSnapshot, JsonFileStore, Options},
    texture::{check_layer_files, decode_default_layers, TextureSet},
    GlobeEngine, InputEvent, InputProcessor, KeyBindings,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    assets: PathBuf,
    config: PathBuf,
    screenshots: PathBuf,
    options: Options,
    key_bindings: KeyBindings,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            assets: PathBuf::from("."),
            config: PathBuf::from("terra_config.json"),
            screenshots: PathBuf::from("."),
            options: Options::default(),
            key_bindings: KeyBindings::default(),
            title: "Terra".into(),
        }
    }

    /// Directory holding the layer textures.
    #[must_use]
    pub fn with_assets(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets = dir.into();
        self
    }

    /// JSON file the state is loaded from and saved to.
    #[must_use]
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = path.into();
        self
    }

    /// Directory screenshots are written to.
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshots = dir.into();
        self
    }

    /// Override the runtime constants.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Override the keyboard map.
    #[must_use]
    pub fn with_key_bindings(mut self, key_bindings: KeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer { config: self }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window showing the globe.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    config: ViewerBuilder,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Check and decode the textures, load the saved state, open the window
    /// and run until quit. Blocks.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::MissingAssets`] if a layer file is absent, or
    /// an error if the window or GPU cannot be initialised.
    pub fn run(self) -> Result<(), TerraError> {
        let cfg = self.config;
        check_layer_files(&cfg.assets)?;
        let images = decode_default_layers(&cfg.assets);

        let store = JsonFileStore::new(&cfg.config);
        let snapshot = load_or_default(&store);
        let screenshots = ScreenshotWriter::new(cfg.screenshots);
        log::info!(
            "config {}, screenshots to {}",
            store.path().display(),
            screenshots.dir().display()
        );

        let event_loop =
            EventLoop::new().map_err(|e| TerraError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            input: InputProcessor::with_key_bindings(cfg.key_bindings),
            startup: Some(Startup {
                options: cfg.options,
                store,
                screenshots,
                images,
                snapshot,
            }),
            title: cfg.title,
            shown_title: String::new(),
            error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| TerraError::Viewer(e.to_string()))?;
        app.error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Everything the engine is built from once the window exists.
struct Startup {
    options: Options,
    store: JsonFileStore,
    screenshots: ScreenshotWriter,
    images: TextureSet<image::RgbaImage>,
    snapshot: ConfigSnapshot,
}

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<GlobeEngine>,
    input: InputProcessor,
    startup: Option<Startup>,
    title: String,
    shown_title: String,
    error: Option<TerraError>,
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: TerraError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn handle_input(&mut self, event: InputEvent) {
        if let (Some(command), Some(engine)) =
            (self.input.handle_event(event), &mut self.engine)
        {
            engine.execute(command);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };
        let _ = engine.advance(Instant::now());
        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let inner = window.inner_size();
                engine.resize(inner.width, inner.height);
            }
            Err(e) => log::error!("render error: {e:?}"),
        }

        let title = engine.window_title().replacen("Terra", &self.title, 1);
        if title != self.shown_title {
            window.set_title(&title);
            self.shown_title = title;
        }
        if engine.quit_requested() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(startup) = self.startup.take() else {
            return;
        };

        let [width, height] = startup.snapshot.resolution;
        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                width.max(1),
                height.max(1),
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, TerraError::Viewer(e.to_string()));
                return;
            }
        };

        let inner = window.inner_size();
        let size = (inner.width.max(1), inner.height.max(1));
        let context =
            match pollster::block_on(RenderContext::new(window.clone(), size)) {
                Ok(c) => c,
                Err(e) => {
                    self.fail(event_loop, e.into());
                    return;
                }
            };

        let mut engine = GlobeEngine::new(
            startup.options,
            Box::new(startup.store),
            startup.screenshots,
            size,
        );
        engine.attach_gpu(context, startup.images);
        engine.apply_snapshot(&startup.snapshot);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(engine) = &mut self.engine {
                    engine.execute(crate::GlobeCommand::Quit);
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_input(InputEvent::MouseButton {
                    button: button.into(),
                    pressed: state == ElementState::Pressed,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_input(InputEvent::from_scroll(delta));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = format!("{code:?}");
                    if let (Some(command), Some(engine)) =
                        (self.input.handle_key_press(&key), &mut self.engine)
                    {
                        engine.execute(command);
                    }
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(engine)) = (&self.window, &self.engine) else {
            return;
        };
        if engine.quit_requested() {
            event_loop.exit();
            return;
        }
        if engine.frame_due(Instant::now()) {
            window.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(
                engine.next_frame_at(),
            ));
        }
    }
}
