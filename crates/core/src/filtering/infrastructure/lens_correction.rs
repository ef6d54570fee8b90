use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::shared::pixel_buffer::{PixelBuffer, CHANNELS};

/// Radial (barrel/pincushion) distortion correction.
///
/// `strength` is a percentage in `[-100, 100]`; `k = strength / 100`. Each
/// destination pixel samples the source at `center + delta / (1 + k·d²)`,
/// where `d` is the normalized distance from the center. Sources that fall
/// outside the frame leave the destination untouched. Samples come from an
/// unmodified copy of the frame, so earlier writes never feed later reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LensCorrection {
    k: f64,
}

impl LensCorrection {
    pub fn new(strength: f64) -> Self {
        Self {
            k: strength.clamp(-100.0, 100.0) / 100.0,
        }
    }
}

impl PixelFilter for LensCorrection {
    fn name(&self) -> &str {
        "lens-correction"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        if self.k == 0.0 {
            return;
        }
        let w = buffer.width() as usize;
        let h = buffer.height() as usize;
        let cx = w as f64 / 2.0;
        let cy = h as f64 / 2.0;
        let max_radius = (cx * cx + cy * cy).sqrt();
        if max_radius == 0.0 {
            return;
        }

        let source = buffer.data().to_vec();
        let data = buffer.data_mut();
        for y in 0..h {
            for x in 0..w {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                let d = (dx * dx + dy * dy).sqrt() / max_radius;
                let correction = 1.0 + self.k * d * d;

                let sx = (cx + dx / correction).floor();
                let sy = (cy + dy / correction).floor();
                if sx < 0.0 || sy < 0.0 || sx >= w as f64 || sy >= h as f64 {
                    continue;
                }

                let src = (sy as usize * w + sx as usize) * CHANNELS;
                let dst = (y * w + x) * CHANNELS;
                data[dst..dst + 3].copy_from_slice(&source[src..src + 3]);
            }
        }
    }
}

/// Lateral chromatic aberration correction: the red channel is sampled
/// `shift` pixels to the right and the blue channel `shift` pixels to the
/// left (clamped to the row), green is left alone. `shift = strength / 10`
/// with `strength` in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChromaticAberrationCorrection {
    shift: f64,
}

impl ChromaticAberrationCorrection {
    pub fn new(strength: f64) -> Self {
        Self {
            shift: strength.clamp(0.0, 100.0) / 10.0,
        }
    }
}

impl PixelFilter for ChromaticAberrationCorrection {
    fn name(&self) -> &str {
        "chromatic-aberration"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        if self.shift == 0.0 {
            return;
        }
        let w = buffer.width() as usize;
        let h = buffer.height() as usize;
        if w == 0 {
            return;
        }
        let max_x = (w - 1) as f64;

        let source = buffer.data().to_vec();
        let data = buffer.data_mut();
        for y in 0..h {
            let row = y * w;
            for x in 0..w {
                let red_x = (x as f64 + self.shift).clamp(0.0, max_x).floor() as usize;
                let blue_x = (x as f64 - self.shift).clamp(0.0, max_x).floor() as usize;
                let dst = (row + x) * CHANNELS;
                data[dst] = source[(row + red_x) * CHANNELS];
                data[dst + 2] = source[(row + blue_x) * CHANNELS + 2];
            }
        }
    }
}
