//! Globe geometry: UV-sphere generation and a parameter-keyed cache.

/// UV-sphere generator.
pub mod sphere;

pub use sphere::{generate, SphereMesh};

/// Holds the last generated sphere and rebuilds it only when the radius or
/// tessellation changes.
#[derive(Debug, Default)]
pub struct MeshCache {
    mesh: Option<SphereMesh>,
    generation: u64,
}

impl MeshCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the mesh for `(radius, segments)`, regenerating it if the
    /// cached one was built with different parameters.
    pub fn get(&mut self, radius: f32, segments: u32) -> &SphereMesh {
        let stale = self.mesh.as_ref().is_none_or(|m| {
            m.radius != radius || m.segments != segments.max(1)
        });
        if stale {
            log::debug!("regenerating sphere mesh r={radius} n={segments}");
            self.mesh = Some(generate(radius, segments));
            self.generation += 1;
        }
        self.mesh.get_or_insert_with(|| generate(radius, segments))
    }

    /// Number of times the mesh has been (re)built. The GPU side compares
    /// this against its own copy to know when to re-upload.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_reuses_mesh_for_same_parameters() {
        let mut cache = MeshCache::new();
        let _ = cache.get(2.0, 32);
        let _ = cache.get(2.0, 32);
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn cache_regenerates_on_change() {
        let mut cache = MeshCache::new();
        let _ = cache.get(2.0, 32);
        let mesh = cache.get(2.0, 16);
        assert_eq!(mesh.segments, 16);
        assert_eq!(cache.generation(), 2);
        let mesh = cache.get(3.0, 16);
        assert_eq!(mesh.radius, 3.0);
        assert_eq!(cache.generation(), 3);
    }
}
