//! GPU resource management: device/surface setup, pipeline boilerplate,
//! textures, and screenshot readback.

/// Screenshot readback and PNG output.
pub mod capture;
/// Shared wgpu boilerplate helpers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Sampled textures, render targets, and depth buffers.
pub mod texture;
