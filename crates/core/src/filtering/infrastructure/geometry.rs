use ndarray::Axis;
use serde::{Deserialize, Serialize};

use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::shared::constants::MAX_RESIZE_DIMENSION;
use crate::shared::pixel_buffer::PixelBuffer;

use super::pixel_ops::resampled;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// Clockwise quarter turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[serde(rename = "90")]
    Quarter,
    #[serde(rename = "180")]
    Half,
    #[serde(rename = "270")]
    ThreeQuarter,
}

pub struct Flip {
    axis: FlipAxis,
}

impl Flip {
    pub fn new(axis: FlipAxis) -> Self {
        Self { axis }
    }
}

impl PixelFilter for Flip {
    fn name(&self) -> &str {
        match self.axis {
            FlipAxis::Horizontal => "flip-horizontal",
            FlipAxis::Vertical => "flip-vertical",
        }
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let axis = match self.axis {
            FlipAxis::Horizontal => Axis(1),
            FlipAxis::Vertical => Axis(0),
        };
        let mut mirrored = buffer.as_ndarray();
        mirrored.invert_axis(axis);
        let mirrored = mirrored.to_owned();
        buffer.as_ndarray_mut().assign(&mirrored);
    }
}

/// Rotates clockwise. 90 and 270 swap the buffer dimensions.
pub struct Rotate {
    rotation: Rotation,
}

impl Rotate {
    pub fn new(rotation: Rotation) -> Self {
        Self { rotation }
    }
}

impl PixelFilter for Rotate {
    fn name(&self) -> &str {
        match self.rotation {
            Rotation::Quarter => "rotate-90",
            Rotation::Half => "rotate-180",
            Rotation::ThreeQuarter => "rotate-270",
        }
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let w = buffer.width() as usize;
        let h = buffer.height() as usize;
        let (out_w, out_h) = match self.rotation {
            Rotation::Half => (w, h),
            Rotation::Quarter | Rotation::ThreeQuarter => (h, w),
        };

        let mut out = PixelBuffer::filled(out_w as u32, out_h as u32, [0, 0, 0, 0]);
        for y in 0..h {
            for x in 0..w {
                let (nx, ny) = match self.rotation {
                    Rotation::Quarter => (h - 1 - y, x),
                    Rotation::Half => (w - 1 - x, h - 1 - y),
                    Rotation::ThreeQuarter => (y, w - 1 - x),
                };
                out.set_pixel(nx, ny, buffer.pixel(x, y));
            }
        }
        *buffer = out;
    }
}

/// Bilinear resample to a target size. A missing dimension keeps the
/// current one; requested sizes are clamped to `[1, MAX_RESIZE_DIMENSION]`.
pub struct Resize {
    width: Option<u32>,
    height: Option<u32>,
}

impl Resize {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        let dim = |v: u32| v.clamp(1, MAX_RESIZE_DIMENSION);
        Self {
            width: width.map(dim),
            height: height.map(dim),
        }
    }

    pub fn target(&self, width: u32, height: u32) -> (u32, u32) {
        (self.width.unwrap_or(width), self.height.unwrap_or(height))
    }
}

impl PixelFilter for Resize {
    fn name(&self) -> &str {
        "resize"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let (w, h) = (buffer.width(), buffer.height());
        let (new_w, new_h) = self.target(w, h);
        if buffer.pixel_count() == 0 || (new_w, new_h) == (w, h) {
            return;
        }
        let resized = resampled(buffer.data(), w, h, new_w, new_h)
            .map(|data| PixelBuffer::new(data, new_w, new_h));
        match resized {
            Some(Ok(out)) => {
                log::debug!("Resized {}x{} -> {}x{}", w, h, new_w, new_h);
                *buffer = out;
            }
            Some(Err(e)) => log::warn!("Resize to {}x{} failed: {}", new_w, new_h, e),
            None => log::warn!("Resize skipped: {}x{} buffer has an invalid layout", w, h),
        }
    }
}
