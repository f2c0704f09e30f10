use std::collections::BTreeSet;
use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// CPU-side UV-sphere geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    /// Vertex positions, `(segments + 1)^2` of them, latitude-major.
    pub positions: Vec<Vec3>,
    /// Texture coordinates, one per position.
    pub uvs: Vec<Vec2>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
    /// Radius the positions were generated with.
    pub radius: f32,
    /// Latitude/longitude band count.
    pub segments: u32,
}

impl SphereMesh {
    /// Number of triangles in [`indices`](Self::indices).
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unique undirected edges of the triangle list, flattened as a line
    /// list. Used for the wireframe view mode.
    #[must_use]
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut edges = BTreeSet::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])]
            {
                let _ = edges.insert(if a < b { (a, b) } else { (b, a) });
            }
        }
        edges.into_iter().flat_map(|(a, b)| [a, b]).collect()
    }
}

/// Generate a UV-sphere of `radius` with `segments` latitude and longitude
/// bands.
///
/// Latitude runs from -π/2 (row 0) to π/2, longitude from 0 to 2π. The seam
/// column is duplicated so each vertex has a single UV. `segments` below 1
/// is treated as 1.
#[must_use]
pub fn generate(radius: f32, segments: u32) -> SphereMesh {
    let n = segments.max(1);
    let row = n + 1;
    let nf = n as f32;

    let vertex_count = (row * row) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for i in 0..=n {
        let lat = PI * (-0.5 + i as f32 / nf);
        let (sin_lat, cos_lat) = lat.sin_cos();
        for j in 0..=n {
            let lon = TAU * j as f32 / nf;
            let (sin_lon, cos_lon) = lon.sin_cos();
            positions.push(
                Vec3::new(cos_lat * cos_lon, sin_lat, cos_lat * sin_lon)
                    * radius,
            );
            uvs.push(Vec2::new(1.0 - j as f32 / nf, i as f32 / nf));
        }
    }

    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for i in 0..n {
        for j in 0..n {
            let a = i * row + j;
            let below = a + row;
            indices.extend_from_slice(&[a, below, below + 1]);
            indices.extend_from_slice(&[a, below + 1, a + 1]);
        }
    }

    SphereMesh {
        positions,
        uvs,
        indices,
        radius,
        segments: n,
    }
}
