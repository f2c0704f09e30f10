//! Orthographic pass that draws the overlay's [`Quad`]s over the globe.

use crate::gpu::pipeline_helpers::{
    create_mesh_pipeline, uniform_buffer, MeshPipelineDesc,
};
use crate::overlay::Quad;

/// One corner of an overlay quad.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    /// Pixel position, origin top-left.
    pub position: [f32; 2],
    /// Straight RGBA.
    pub color: [f32; 4],
}

impl OverlayVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Two triangles per quad, in draw order.
#[must_use]
pub fn quad_vertices(quads: &[Quad]) -> Vec<OverlayVertex> {
    let mut out = Vec::with_capacity(quads.len() * 6);
    for q in quads {
        let r = q.rect;
        let (x0, y0, x1, y1) = (r.x, r.y, r.x + r.w, r.y + r.h);
        for (x, y) in [(x0, y0), (x1, y0), (x1, y1), (x0, y0), (x1, y1), (x0, y1)]
        {
            out.push(OverlayVertex {
                position: [x, y],
                color: q.color,
            });
        }
    }
    out
}

const INITIAL_CAPACITY: u64 = 4096;

/// Alpha-blended 2D quad pipeline with a growable vertex buffer.
pub struct OverlayPass {
    pipeline: wgpu::RenderPipeline,
    screen_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    capacity: u64,
    vertex_count: u32,
}

impl OverlayPass {
    /// Build the pipeline for a `format` colour target.
    #[must_use]
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/overlay.wgsl").into(),
            ),
        });
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Overlay Layout"),
                entries: &[uniform_buffer(0)],
            });
        let pipeline = create_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "Overlay",
                shader: &shader,
                fs_entry: "fs_main",
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                vertex_layout: OverlayVertex::layout(),
                primitive: wgpu::PrimitiveState::default(),
                depth: None,
                bind_group_layouts: &[&layout],
            },
        );

        let screen_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Screen Buffer"),
            size: size_of::<[f32; 4]>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            screen_buffer,
            bind_group,
            vertex_buffer: create_vertex_buffer(device, INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            vertex_count: 0,
        }
    }

    /// Upload this frame's quads for a `width` x `height` target.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        quads: &[Quad],
        (width, height): (u32, u32),
    ) {
        let screen = [width.max(1) as f32, height.max(1) as f32, 0.0, 0.0];
        queue.write_buffer(&self.screen_buffer, 0, bytemuck::cast_slice(&screen));

        let vertices = quad_vertices(quads);
        let needed = vertices.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.capacity);
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        self.vertex_count = vertices.len() as u32;
    }

    /// Record the quad draw.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertices: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Overlay Vertex Buffer"),
        size: vertices * size_of::<OverlayVertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Rect;

    #[test]
    fn quad_becomes_two_triangles() {
        let verts = quad_vertices(&[Quad {
            rect: Rect::new(10.0, 20.0, 30.0, 40.0),
            color: [1.0, 0.0, 0.0, 1.0],
        }]);
        assert_eq!(verts.len(), 6);
        let corners: Vec<[f32; 2]> = verts.iter().map(|v| v.position).collect();
        assert_eq!(corners[0], [10.0, 20.0]);
        assert_eq!(corners[2], [40.0, 60.0]);
        assert_eq!(corners[5], [10.0, 60.0]);
        assert!(verts.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn vertex_stride() {
        assert_eq!(size_of::<OverlayVertex>(), 24);
        assert!(quad_vertices(&[]).is_empty());
    }
}
