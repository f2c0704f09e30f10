//! GPU drawing: the globe pass followed by the orthographic overlay pass.
//!
//! [`GlobeRenderer::render`] records into any colour view of the surface
//! format, so the same path serves the swapchain and screenshot targets.

/// Sphere pipelines and layer textures.
pub mod globe;
/// Screen-space quad pipeline.
pub mod overlay;

use self::globe::{GlobeFrame, GlobePass};
use self::overlay::OverlayPass;
use crate::gpu::texture::DepthTarget;
use crate::mesh::MeshCache;
use crate::options::DisplayOptions;
use crate::overlay::Quad;

/// Everything one frame draws.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    /// Camera and globe toggles.
    pub globe: GlobeFrame,
    /// Index of the active layer from [`GlobeRenderer::add_layer`].
    pub layer: Option<usize>,
    /// Overlay quads, back to front.
    pub quads: &'a [Quad],
}

/// Owns both passes, the depth buffer, and the uploaded layers.
pub struct GlobeRenderer {
    globe: GlobePass,
    overlay: OverlayPass,
    depth: DepthTarget,
    layers: Vec<wgpu::BindGroup>,
    clear: wgpu::Color,
}

impl GlobeRenderer {
    /// Build the pipelines for `format` and a depth buffer of `size`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        size: (u32, u32),
        display: &DisplayOptions,
    ) -> Self {
        let [r, g, b] = display.clear_color.map(f64::from);
        Self {
            globe: GlobePass::new(device, queue, format, display),
            overlay: OverlayPass::new(device, format),
            depth: DepthTarget::new(device, size.0, size.1),
            layers: Vec::new(),
            clear: wgpu::Color { r, g, b, a: 1.0 },
        }
    }

    /// Upload a layer texture. Returns the index to pass in
    /// [`FrameInputs::layer`].
    pub fn add_layer(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        image: &image::RgbaImage,
    ) -> usize {
        self.layers
            .push(self.globe.create_layer(device, queue, name, image));
        self.layers.len() - 1
    }

    /// Re-upload the sphere if the cache rebuilt it.
    pub fn sync_mesh(
        &mut self,
        device: &wgpu::Device,
        cache: &mut MeshCache,
        display: &DisplayOptions,
    ) {
        self.globe.sync_mesh(device, cache, display);
    }

    /// Record both passes into `encoder`, drawing to `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size: (u32, u32),
        frame: &FrameInputs<'_>,
    ) {
        self.depth.ensure_size(device, size.0, size.1);
        self.globe.prepare(queue, &frame.globe);
        self.overlay.prepare(device, queue, frame.quads, size);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Globe Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Discard,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let layer = frame.layer.and_then(|i| self.layers.get(i));
            self.globe.draw(&mut pass, &frame.globe, layer);
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.overlay.draw(&mut pass);
    }
}
