use ndarray::{ArrayView3, ArrayViewMut3};
use thiserror::Error;

use crate::shared::region::{Point, Region};

/// Samples per pixel: R, G, B, A.
pub const CHANNELS: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PixelBufferError {
    #[error("data length {actual} does not match {width}x{height} RGBA (expected {expected})")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// An RGBA image: contiguous 8-bit samples in row-major order.
///
/// The length invariant (`width * height * 4`) is checked once at
/// construction, so kernels receiving a `PixelBuffer` never see a
/// buffer/dimension mismatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, PixelBufferError> {
        let expected = (width as usize) * (height as usize) * CHANNELS;
        if data.len() != expected {
            return Err(PixelBufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * CHANNELS)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Size of the sample data in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as u32) < self.width
            && (point.y as u32) < self.height
    }

    /// Byte offset of the first (red) sample of pixel `(x, y)`.
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * CHANNELS
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.index_of(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = self.index_of(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = self.index_of(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.data[self.index_of(x, y) + 3]
    }

    pub fn set_alpha(&mut self, x: usize, y: usize, alpha: u8) {
        let i = self.index_of(x, y) + 3;
        self.data[i] = alpha;
    }

    /// Copies the pixels inside `region` into a new buffer.
    ///
    /// The region must lie inside the buffer.
    pub fn crop(&self, region: &Region) -> PixelBuffer {
        debug_assert!(
            region.fits_within(self.width, self.height),
            "crop region must lie inside the buffer"
        );
        let rx = region.x as usize;
        let ry = region.y as usize;
        let rw = region.width as usize;
        let rh = region.height as usize;
        let mut out = Vec::with_capacity(rw * rh * CHANNELS);
        for row in 0..rh {
            let start = self.index_of(rx, ry + row);
            out.extend_from_slice(&self.data[start..start + rw * CHANNELS]);
        }
        PixelBuffer {
            data: out,
            width: rw as u32,
            height: rh as u32,
        }
    }

    /// Writes `src` with its top-left corner at `(x, y)`, clipping whatever
    /// falls outside this buffer.
    pub fn paste(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        let fw = self.width as i32;
        let fh = self.height as i32;
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + src.width as i32).min(fw);
        let y1 = (y + src.height as i32).min(fh);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let span = (x1 - x0) as usize * CHANNELS;
        for dy in y0..y1 {
            let src_start = src.index_of((x0 - x) as usize, (dy - y) as usize);
            let dst_start = self.index_of(x0 as usize, dy as usize);
            self.data[dst_start..dst_start + span]
                .copy_from_slice(&src.data[src_start..src_start + span]);
        }
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("PixelBuffer data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("PixelBuffer data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}
