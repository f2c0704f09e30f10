//! Screenshot readback and PNG output.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::error::TerraError;

/// Copy `texture` (4 bytes per pixel) into tightly packed rows.
///
/// Blocks until the GPU has finished the copy.
///
/// # Errors
///
/// Returns [`TerraError::Capture`] if the staging buffer cannot be mapped.
pub fn read_texture_pixels(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, TerraError> {
    let unpadded = width * 4;
    let padded = padded_bytes_per_row(width);

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Screenshot Staging Buffer"),
        size: u64::from(padded) * u64::from(height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Screenshot Copy Encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    let _ = queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (sender, receiver) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    let mapped = loop {
        let _ = device.poll(wgpu::PollType::Poll);
        match receiver.try_recv() {
            Ok(result) => break result,
            Err(mpsc::TryRecvError::Empty) => std::thread::yield_now(),
            Err(mpsc::TryRecvError::Disconnected) => {
                return Err(TerraError::Capture(
                    "map callback dropped".to_owned(),
                ));
            }
        }
    };
    mapped.map_err(|e| TerraError::Capture(e.to_string()))?;

    let data = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((unpadded * height) as usize);
    for row in data.chunks_exact(padded as usize) {
        pixels.extend_from_slice(&row[..unpadded as usize]);
    }
    drop(data);
    staging.unmap();
    Ok(pixels)
}

/// Row pitch for a texture-to-buffer copy of a 4-byte-per-pixel image.
#[must_use]
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

/// Reorder BGRA pixels to RGBA in place when `format` is a BGRA format.
pub fn to_rgba(pixels: &mut [u8], format: wgpu::TextureFormat) {
    if matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    ) {
        for px in pixels.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }
}

/// `screenshot_<local time>_<n>.png`.
#[must_use]
pub fn screenshot_filename(
    now: &chrono::DateTime<chrono::Local>,
    counter: u32,
) -> String {
    format!("screenshot_{}_{counter}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Pending screenshot request and output directory.
#[derive(Debug)]
pub struct ScreenshotWriter {
    dir: PathBuf,
    counter: u32,
    pending: bool,
}

impl ScreenshotWriter {
    /// Write screenshots into `dir` (created on first save).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: 0,
            pending: false,
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ask for the next frame to be captured.
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Whether a capture is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clear and return the pending flag.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Encode tightly packed RGBA `pixels` as a PNG in the output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the pixel
    /// buffer does not match the size, or the encoder fails.
    pub fn save(
        &mut self,
        pixels: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Result<PathBuf, TerraError> {
        let img = image::RgbaImage::from_raw(width, height, pixels).ok_or_else(
            || TerraError::Capture(format!("pixel buffer does not match {width}x{height}")),
        )?;
        std::fs::create_dir_all(&self.dir)?;
        self.counter += 1;
        let path = self
            .dir
            .join(screenshot_filename(&chrono::Local::now(), self.counter));
        img.save(&path)
            .map_err(|e| TerraError::Capture(e.to_string()))?;
        log::info!("saved screenshot {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn row_pitch_is_aligned() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1280), 5120);
    }

    #[test]
    fn bgra_swizzled() {
        let mut px = vec![1, 2, 3, 4, 5, 6, 7, 8];
        to_rgba(&mut px, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(px, [3, 2, 1, 4, 7, 6, 5, 8]);
        to_rgba(&mut px, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(px, [3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn filename_carries_timestamp_and_counter() {
        let t = chrono::Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .unwrap();
        assert_eq!(screenshot_filename(&t, 3), "screenshot_20240309_140507_3.png");
    }

    #[test]
    fn save_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ScreenshotWriter::new(dir.path().join("shots"));
        writer.request();
        assert!(writer.take_request());
        assert!(!writer.is_pending());
        let path = writer.save(vec![255; 4 * 3 * 2], 3, 2).unwrap();
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
    }

    #[test]
    fn save_rejects_short_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ScreenshotWriter::new(dir.path());
        assert!(matches!(
            writer.save(vec![0; 5], 3, 2),
            Err(TerraError::Capture(_))
        ));
    }
}
