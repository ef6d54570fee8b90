use std::path::Path;

use crate::imaging::domain::image_io::{ImageIoError, ImageReader};
use crate::shared::pixel_buffer::PixelBuffer;

/// Decodes any format the `image` crate understands and converts it to
/// RGBA8. Images without alpha come back fully opaque.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<PixelBuffer, ImageIoError> {
        let img = image::open(path)
            .map_err(|source| ImageIoError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        log::debug!("Read {}x{} image from {}", width, height, path.display());
        Ok(PixelBuffer::new(img.into_raw(), width, height)?)
    }
}
