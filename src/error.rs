//! Crate-level error types.

use std::fmt;
use std::path::PathBuf;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the terra crate.
#[derive(Debug)]
pub enum TerraError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// JSON config parsing/serialization failure.
    Config(String),
    /// Failed to decode a texture image.
    Texture {
        /// File the decoder was reading.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
    /// Required texture files are absent from the asset directory.
    MissingAssets(Vec<String>),
    /// Frame readback or image encode failure.
    Capture(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for TerraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Texture { path, message } => {
                write!(f, "failed to load texture {}: {message}", path.display())
            }
            Self::MissingAssets(files) => {
                write!(f, "missing texture files: {}", files.join(", "))
            }
            Self::Capture(msg) => write!(f, "screenshot failed: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for TerraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for TerraError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for TerraError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TerraError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
