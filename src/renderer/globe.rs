//! Globe pass: the textured sphere in one of four view modes, plus the
//! translucent atmosphere shell.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::gpu::pipeline_helpers::{
    create_mesh_pipeline, depth_state, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer, MeshPipelineDesc,
};
use crate::gpu::texture::GpuTexture;
use crate::mesh::{MeshCache, SphereMesh};
use crate::options::{DisplayOptions, ViewMode};

/// Light direction in view space: up, left, and toward the viewer.
const VIEW_LIGHT: Vec3 = Vec3::new(-0.4, 0.5, 0.75);
const WIRE_TINT: [f32; 4] = [0.3, 0.8, 1.0, 1.0];
const ATMOSPHERE_TINT: [f32; 4] = [0.35, 0.6, 1.0, 0.7];

/// Interleaved sphere vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobeVertex {
    /// Position on the unscaled mesh.
    pub position: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl GlobeVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Interleave a mesh's positions and UVs.
    #[must_use]
    pub fn from_mesh(mesh: &SphereMesh) -> Vec<Self> {
        mesh.positions
            .iter()
            .zip(&mesh.uvs)
            .map(|(p, uv)| Self {
                position: p.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }
}

/// Per-draw globe uniforms. Layout matches `Globe` in `globe.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobeUniform {
    /// Projection times view.
    pub view_proj: [[f32; 4]; 4],
    /// World-space eye position (w unused).
    pub eye: [f32; 4],
    /// World-space direction toward the light (w unused).
    pub light_dir: [f32; 4],
    /// x: radius scale, y: lighting, z: night mode.
    pub params: [f32; 4],
    /// Line colour for wireframes, glow colour and strength for the shell.
    pub tint: [f32; 4],
}

/// Camera and toggles the globe pass needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct GlobeFrame {
    /// View transform.
    pub view: Mat4,
    /// Projection transform.
    pub proj: Mat4,
    /// Surface mode.
    pub view_mode: ViewMode,
    /// Diffuse and specular lighting.
    pub effects: bool,
    /// Draw the atmosphere shell.
    pub atmosphere: bool,
}

impl GlobeUniform {
    /// Uniforms for a sphere of `scale` times the mesh radius.
    #[must_use]
    pub fn new(frame: &GlobeFrame, scale: f32, tint: [f32; 4]) -> Self {
        let inv_view = frame.view.inverse();
        let eye = inv_view.transform_point3(Vec3::ZERO);
        let light = inv_view.transform_vector3(VIEW_LIGHT).normalize();
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        Self {
            view_proj: (frame.proj * frame.view).to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            light_dir: light.extend(0.0).to_array(),
            params: [
                scale,
                flag(frame.effects),
                flag(frame.view_mode == ViewMode::Night),
                0.0,
            ],
            tint,
        }
    }
}

struct MeshBuffers {
    vertices: wgpu::Buffer,
    vertex_count: u32,
    triangles: wgpu::Buffer,
    triangle_count: u32,
    lines: wgpu::Buffer,
    line_count: u32,
    generation: u64,
}

impl MeshBuffers {
    fn upload(device: &wgpu::Device, mesh: &SphereMesh, generation: u64) -> Self {
        let vertices = GlobeVertex::from_mesh(mesh);
        let lines = mesh.wireframe_indices();
        let init = |label: &str, contents: &[u8], usage| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        };
        Self {
            vertices: init(
                "Globe Vertex Buffer",
                bytemuck::cast_slice(&vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            vertex_count: vertices.len() as u32,
            triangles: init(
                "Globe Triangle Index Buffer",
                bytemuck::cast_slice(&mesh.indices),
                wgpu::BufferUsages::INDEX,
            ),
            triangle_count: mesh.indices.len() as u32,
            lines: init(
                "Globe Line Index Buffer",
                bytemuck::cast_slice(&lines),
                wgpu::BufferUsages::INDEX,
            ),
            line_count: lines.len() as u32,
            generation,
        }
    }
}

/// Sphere pipelines, mesh buffers, and per-layer texture bindings.
pub struct GlobePass {
    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    atmosphere_pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    surface_uniform: wgpu::Buffer,
    surface_bind_group: wgpu::BindGroup,
    atmosphere_uniform: wgpu::Buffer,
    atmosphere_bind_group: wgpu::BindGroup,
    fallback: wgpu::BindGroup,
    mesh: Option<MeshBuffers>,
    atmosphere_scale: f32,
}

impl GlobePass {
    /// Build every globe pipeline for a `format` colour target.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        display: &DisplayOptions,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Globe Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/globe.wgsl").into(),
            ),
        });

        let uniform_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globe Uniform Layout"),
                entries: &[uniform_buffer(0)],
            });
        let texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globe Texture Layout"),
                entries: &[texture_2d(0), filtering_sampler(1)],
            });
        let layouts = [&uniform_layout, &texture_layout];

        let pipeline = |label: &str,
                        fs_entry: &str,
                        topology: wgpu::PrimitiveTopology,
                        blend: Option<wgpu::BlendState>,
                        depth_write: bool| {
            create_mesh_pipeline(
                device,
                MeshPipelineDesc {
                    label,
                    shader: &shader,
                    fs_entry,
                    format,
                    blend,
                    vertex_layout: GlobeVertex::layout(),
                    primitive: wgpu::PrimitiveState {
                        topology,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth: Some(depth_state(depth_write)),
                    bind_group_layouts: &layouts,
                },
            )
        };
        let fill_pipeline = pipeline(
            "Globe Fill",
            "fs_surface",
            wgpu::PrimitiveTopology::TriangleList,
            None,
            true,
        );
        let line_pipeline = pipeline(
            "Globe Wireframe",
            "fs_wire",
            wgpu::PrimitiveTopology::LineList,
            None,
            true,
        );
        let point_pipeline = pipeline(
            "Globe Points",
            "fs_wire",
            wgpu::PrimitiveTopology::PointList,
            None,
            true,
        );
        let atmosphere_pipeline = pipeline(
            "Globe Atmosphere",
            "fs_atmosphere",
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );

        let uniform = |label: &str| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: size_of::<GlobeUniform>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group =
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(label),
                    layout: &uniform_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
            (buffer, bind_group)
        };
        let (surface_uniform, surface_bind_group) = uniform("Globe Surface Uniform");
        let (atmosphere_uniform, atmosphere_bind_group) =
            uniform("Globe Atmosphere Uniform");

        let sampler = linear_sampler(device, "Globe Sampler");
        let white = image::RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]));
        let fallback_texture =
            GpuTexture::from_rgba(device, queue, "Globe Fallback Texture", &white);
        let fallback = texture_bind_group(
            device,
            &texture_layout,
            &sampler,
            &fallback_texture,
            "Globe Fallback Bind Group",
        );

        Self {
            fill_pipeline,
            line_pipeline,
            point_pipeline,
            atmosphere_pipeline,
            texture_layout,
            sampler,
            surface_uniform,
            surface_bind_group,
            atmosphere_uniform,
            atmosphere_bind_group,
            fallback,
            mesh: None,
            atmosphere_scale: display.atmosphere_scale,
        }
    }

    /// Upload `image` and return a bind group for drawing with it.
    #[must_use]
    pub fn create_layer(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        image: &image::RgbaImage,
    ) -> wgpu::BindGroup {
        let texture = GpuTexture::from_rgba(device, queue, name, image);
        log::debug!(
            "uploaded layer {name} ({}x{})",
            texture.size.0,
            texture.size.1
        );
        texture_bind_group(device, &self.texture_layout, &self.sampler, &texture, name)
    }

    /// Re-upload the sphere if the cache rebuilt it since the last call.
    pub fn sync_mesh(
        &mut self,
        device: &wgpu::Device,
        cache: &mut MeshCache,
        display: &DisplayOptions,
    ) {
        let _ = cache.get(display.globe_radius, display.segments);
        let generation = cache.generation();
        if self.mesh.as_ref().is_some_and(|m| m.generation == generation) {
            return;
        }
        let mesh = cache.get(display.globe_radius, display.segments);
        log::debug!(
            "uploading globe mesh: {} vertices, {} triangles",
            mesh.positions.len(),
            mesh.triangle_count()
        );
        self.mesh = Some(MeshBuffers::upload(device, mesh, generation));
    }

    /// Write this frame's uniforms.
    pub fn prepare(&self, queue: &wgpu::Queue, frame: &GlobeFrame) {
        let surface = GlobeUniform::new(frame, 1.0, WIRE_TINT);
        queue.write_buffer(&self.surface_uniform, 0, bytemuck::bytes_of(&surface));
        if frame.atmosphere {
            let shell =
                GlobeUniform::new(frame, self.atmosphere_scale, ATMOSPHERE_TINT);
            queue.write_buffer(
                &self.atmosphere_uniform,
                0,
                bytemuck::bytes_of(&shell),
            );
        }
    }

    /// Record the globe draws. `layer` is the active texture binding, or
    /// `None` to draw with plain white.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        frame: &GlobeFrame,
        layer: Option<&wgpu::BindGroup>,
    ) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        pass.set_bind_group(0, &self.surface_bind_group, &[]);
        pass.set_bind_group(1, layer.unwrap_or(&self.fallback), &[]);
        pass.set_vertex_buffer(0, mesh.vertices.slice(..));

        match frame.view_mode {
            ViewMode::Normal | ViewMode::Night => {
                pass.set_pipeline(&self.fill_pipeline);
                pass.set_index_buffer(mesh.triangles.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.triangle_count, 0, 0..1);
            }
            ViewMode::Wireframe => {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_index_buffer(mesh.lines.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.line_count, 0, 0..1);
            }
            ViewMode::Points => {
                pass.set_pipeline(&self.point_pipeline);
                pass.draw(0..mesh.vertex_count, 0..1);
            }
        }

        if frame.atmosphere {
            pass.set_pipeline(&self.atmosphere_pipeline);
            pass.set_bind_group(0, &self.atmosphere_bind_group, &[]);
            pass.set_index_buffer(mesh.triangles.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.triangle_count, 0, 0..1);
        }
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    texture: &GpuTexture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generate;

    fn frame(view_mode: ViewMode) -> GlobeFrame {
        GlobeFrame {
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
            proj: Mat4::IDENTITY,
            view_mode,
            effects: true,
            atmosphere: false,
        }
    }

    #[test]
    fn vertices_interleave_mesh() {
        let mesh = generate(2.0, 4);
        let verts = GlobeVertex::from_mesh(&mesh);
        assert_eq!(verts.len(), 25);
        assert_eq!(verts[7].position, mesh.positions[7].to_array());
        assert_eq!(verts[7].uv, mesh.uvs[7].to_array());
        assert_eq!(size_of::<GlobeVertex>(), 20);
    }

    #[test]
    fn uniform_matches_shader_layout() {
        assert_eq!(size_of::<GlobeUniform>(), 128);
    }

    #[test]
    fn eye_is_recovered_from_view() {
        let u = GlobeUniform::new(&frame(ViewMode::Normal), 1.0, WIRE_TINT);
        assert!((Vec3::from_slice(&u.eye[..3]) - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
        assert!((Vec3::from_slice(&u.light_dir[..3]).length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn flags_follow_frame() {
        let night = GlobeUniform::new(&frame(ViewMode::Night), 1.05, WIRE_TINT);
        assert_eq!(night.params, [1.05, 1.0, 1.0, 0.0]);
        let mut f = frame(ViewMode::Wireframe);
        f.effects = false;
        assert_eq!(GlobeUniform::new(&f, 1.0, WIRE_TINT).params, [1.0, 0.0, 0.0, 0.0]);
    }
}
