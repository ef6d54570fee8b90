use std::path::{Path, PathBuf};

use crate::shared::pixel_buffer::{PixelBuffer, PixelBufferError};

#[derive(Debug, thiserror::Error)]
pub enum ImageIoError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Buffer(#[from] PixelBufferError),
}

/// Loads an image file as an RGBA buffer.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<PixelBuffer, ImageIoError>;
}

/// Saves an RGBA buffer; the format follows the path's extension.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, buffer: &PixelBuffer) -> Result<(), ImageIoError>;
}
