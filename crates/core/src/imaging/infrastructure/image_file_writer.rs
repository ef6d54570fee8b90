use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::imaging::domain::image_io::{ImageIoError, ImageWriter};
use crate::shared::pixel_buffer::{PixelBuffer, PixelBufferError, CHANNELS};

/// Formats that cannot store an alpha channel; RGBA is flattened to RGB
/// before encoding.
const OPAQUE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "bmp"];

/// Encodes a buffer with the `image` crate, choosing the format from the
/// file extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_opaque_format(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| OPAQUE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, buffer: &PixelBuffer) -> Result<(), ImageIoError> {
        // Output directories are created on demand.
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ImageIoError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let rgba = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.data().to_vec())
            .ok_or(PixelBufferError::LengthMismatch {
                width: buffer.width(),
                height: buffer.height(),
                expected: buffer.pixel_count() * CHANNELS,
                actual: buffer.byte_len(),
            })?;

        let img = if is_opaque_format(path) {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
        } else {
            DynamicImage::ImageRgba8(rgba)
        };

        img.save(path).map_err(|source| ImageIoError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Wrote {}x{} image to {}", buffer.width(), buffer.height(), path.display());
        Ok(())
    }
}
