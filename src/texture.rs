//! Named globe surface layers and the active-layer selection.

use std::path::{Path, PathBuf};

use crate::error::TerraError;

/// Built-in layer names and the files they are loaded from, in cycle order.
pub const DEFAULT_LAYERS: [(&str, &str); 3] = [
    ("Default", "earth_texture.jpg"),
    ("Political", "earth_political.jpg"),
    ("Detailed", "earth_detailed.jpg"),
];

/// Insertion-ordered mapping from layer name to a texture handle, with one
/// active entry.
///
/// The handle type is opaque: the renderer stores GPU textures, tests store
/// anything. Entries never change after construction; only the active index
/// moves.
#[derive(Debug)]
pub struct TextureSet<H> {
    layers: Vec<(String, H)>,
    active: usize,
}

impl<H> Default for TextureSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> TextureSet<H> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            active: 0,
        }
    }

    /// Append a layer. A duplicate name replaces the existing handle in
    /// place, keeping its position in the cycle.
    pub fn insert(&mut self, name: impl Into<String>, handle: H) {
        let name = name.into();
        if let Some(slot) = self.layers.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = handle;
        } else {
            self.layers.push((name, handle));
        }
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layers are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer names in cycle order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|(n, _)| n.as_str())
    }

    /// Name of the active layer, if any layer is loaded.
    #[must_use]
    pub fn active_name(&self) -> Option<&str> {
        self.layers.get(self.active).map(|(n, _)| n.as_str())
    }

    /// Handle of the active layer.
    #[must_use]
    pub fn active(&self) -> Option<&H> {
        self.layers.get(self.active).map(|(_, h)| h)
    }

    /// Make `name` active. Returns `false` (and changes nothing) if no layer
    /// has that name.
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.layers.iter().position(|(n, _)| n == name) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }

    /// Advance to the next layer, wrapping to the first. Returns the new
    /// active name.
    pub fn cycle(&mut self) -> Option<&str> {
        if self.layers.is_empty() {
            return None;
        }
        self.active = (self.active + 1) % self.layers.len();
        self.active_name()
    }

    /// Apply `f` to every handle, keeping names and the active index.
    pub fn map<T>(self, mut f: impl FnMut(&str, H) -> T) -> TextureSet<T> {
        TextureSet {
            layers: self
                .layers
                .into_iter()
                .map(|(n, h)| {
                    let t = f(&n, h);
                    (n, t)
                })
                .collect(),
            active: self.active,
        }
    }
}

/// Texture files from [`DEFAULT_LAYERS`] that are missing under `dir`.
#[must_use]
pub fn missing_layer_files(dir: &Path) -> Vec<String> {
    DEFAULT_LAYERS
        .iter()
        .filter(|(_, file)| !dir.join(file).is_file())
        .map(|(_, file)| (*file).to_owned())
        .collect()
}

/// Fail with [`TerraError::MissingAssets`] unless every default layer file
/// exists under `dir`.
///
/// # Errors
///
/// Returns the list of absent filenames.
pub fn check_layer_files(dir: &Path) -> Result<(), TerraError> {
    let missing = missing_layer_files(dir);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TerraError::MissingAssets(missing))
    }
}

/// Decode one image file to RGBA8.
///
/// # Errors
///
/// Returns [`TerraError::Texture`] if the file cannot be opened or decoded.
pub fn decode_rgba(path: &Path) -> Result<image::RgbaImage, TerraError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| TerraError::Texture {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Decode every default layer under `dir`. Layers that fail to decode are
/// logged and skipped, so the set may be smaller than [`DEFAULT_LAYERS`].
#[must_use]
pub fn decode_default_layers(dir: &Path) -> TextureSet<image::RgbaImage> {
    let mut set = TextureSet::new();
    for (name, file) in DEFAULT_LAYERS {
        let path: PathBuf = dir.join(file);
        match decode_rgba(&path) {
            Ok(img) => {
                log::info!(
                    "loaded layer {name} ({}x{})",
                    img.width(),
                    img.height()
                );
                set.insert(name, img);
            }
            Err(e) => log::warn!("skipping layer {name}: {e}"),
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers() -> TextureSet<u32> {
        let mut set = TextureSet::new();
        for (i, (name, _)) in DEFAULT_LAYERS.iter().enumerate() {
            set.insert(*name, i as u32);
        }
        set
    }

    #[test]
    fn cycle_wraps_in_insertion_order() {
        let mut set = layers();
        assert_eq!(set.active_name(), Some("Default"));
        assert_eq!(set.cycle(), Some("Political"));
        assert_eq!(set.cycle(), Some("Detailed"));
        assert_eq!(set.cycle(), Some("Default"));
        assert_eq!(set.active(), Some(&0));
    }

    #[test]
    fn set_active_unknown_name_is_rejected() {
        let mut set = layers();
        assert!(set.set_active("Detailed"));
        assert!(!set.set_active("Satellite"));
        assert_eq!(set.active_name(), Some("Detailed"));
    }

    #[test]
    fn empty_set_cycles_to_none() {
        let mut set: TextureSet<()> = TextureSet::new();
        assert!(set.cycle().is_none());
        assert!(set.active().is_none());
    }

    #[test]
    fn duplicate_insert_keeps_position() {
        let mut set = layers();
        set.insert("Default", 9);
        assert_eq!(set.len(), 3);
        assert_eq!(set.names().collect::<Vec<_>>(), ["Default", "Political", "Detailed"]);
        assert_eq!(set.active(), Some(&9));
    }

    #[test]
    fn map_preserves_selection() {
        let mut set = layers();
        let _ = set.cycle();
        let mapped = set.map(|name, h| format!("{name}:{h}"));
        assert_eq!(mapped.active().map(String::as_str), Some("Political:1"));
    }

    #[test]
    fn missing_files_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("earth_texture.jpg"), b"x").unwrap();
        let missing = missing_layer_files(dir.path());
        assert_eq!(missing, ["earth_political.jpg", "earth_detailed.jpg"]);
        assert!(matches!(
            check_layer_files(dir.path()),
            Err(TerraError::MissingAssets(files)) if files.len() == 2
        ));
    }

    #[test]
    fn undecodable_layer_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let img =
            image::RgbImage::from_fn(4, 2, |x, _| image::Rgb([x as u8 * 60, 0, 0]));
        img.save(dir.path().join("earth_political.jpg")).unwrap();
        std::fs::write(dir.path().join("earth_texture.jpg"), b"not a jpeg")
            .unwrap();
        let set = decode_default_layers(dir.path());
        assert_eq!(set.names().collect::<Vec<_>>(), ["Political"]);
        assert_eq!(set.active().map(image::RgbaImage::width), Some(4));
    }
}
