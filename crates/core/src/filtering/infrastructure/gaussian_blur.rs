use std::cell::RefCell;

use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::shared::color::clamp_channel;
use crate::shared::pixel_buffer::{PixelBuffer, CHANNELS};

use super::pixel_ops::resampled;

/// Largest accepted blur length, in pixels.
pub const MAX_BLUR_PX: f64 = 50.0;

/// Kernels wider than this are run on a downscaled copy.
const DOWNSCALE_THRESHOLD: usize = 31;

/// 1D Gaussian weights with standard deviation `sigma`, spanning
/// `ceil(3 * sigma)` taps either side of the centre, normalized to sum to 1.
pub fn gaussian_kernel(sigma: f64) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let half = (3.0 * sigma).ceil() as usize;
    let weights: Vec<f64> = (0..=2 * half)
        .map(|i| {
            let x = i as f64 - half as f64;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|&w| (w / sum) as f32).collect()
}

/// Separable RGBA blur with edge clamping. `temp` is reused between calls.
///
/// Color channels are weighted by alpha so transparent pixels do not bleed
/// their (often black) RGB into opaque neighbours.
fn separable_blur(data: &mut [u8], width: usize, height: usize, kernel: &[f32], temp: &mut Vec<f32>) {
    if kernel.len() <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = kernel.len() as isize / 2;
    temp.clear();
    temp.resize(width * height * CHANNELS, 0.0);

    // Horizontal pass into premultiplied floats.
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; CHANNELS];
            for (k, &w) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - half).clamp(0, width as isize - 1) as usize;
                let px = &data[(y * width + sx) * CHANNELS..][..CHANNELS];
                let a = px[3] as f32 / 255.0;
                acc[0] += px[0] as f32 * a * w;
                acc[1] += px[1] as f32 * a * w;
                acc[2] += px[2] as f32 * a * w;
                acc[3] += px[3] as f32 * w;
            }
            temp[(y * width + x) * CHANNELS..][..CHANNELS].copy_from_slice(&acc);
        }
    }

    // Vertical pass back to straight alpha.
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; CHANNELS];
            for (k, &w) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - half).clamp(0, height as isize - 1) as usize;
                let src = &temp[(sy * width + x) * CHANNELS..][..CHANNELS];
                for c in 0..CHANNELS {
                    acc[c] += src[c] * w;
                }
            }
            let out = &mut data[(y * width + x) * CHANNELS..][..CHANNELS];
            let alpha = acc[3];
            if alpha > 0.0 {
                let unpremultiply = 255.0 / alpha;
                out[0] = clamp_channel((acc[0] * unpremultiply) as f64);
                out[1] = clamp_channel((acc[1] * unpremultiply) as f64);
                out[2] = clamp_channel((acc[2] * unpremultiply) as f64);
            }
            out[3] = clamp_channel(alpha as f64);
        }
    }
}

/// Whole-buffer Gaussian blur with CSS `blur(Npx)` semantics: the length
/// is the standard deviation. Zero is the identity.
///
/// Large kernels are applied to a downscaled copy and upscaled back, which
/// keeps big lengths interactive at the cost of some softness.
pub struct GaussianBlur {
    sigma: f64,
    kernel: Vec<f32>,
    scale: usize,
    small_kernel: Vec<f32>,
    temp: RefCell<Vec<f32>>,
}

impl GaussianBlur {
    pub fn new(sigma: f64) -> Self {
        let sigma = if sigma.is_finite() { sigma.clamp(0.0, MAX_BLUR_PX) } else { 0.0 };
        let kernel = gaussian_kernel(sigma);
        let scale = if kernel.len() > DOWNSCALE_THRESHOLD {
            kernel.len() / DOWNSCALE_THRESHOLD + 1
        } else {
            1
        };
        Self {
            sigma,
            small_kernel: gaussian_kernel(sigma / scale as f64),
            kernel,
            scale,
            temp: RefCell::new(Vec::new()),
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl PixelFilter for GaussianBlur {
    fn name(&self) -> &str {
        "gaussian-blur"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        if self.kernel.len() <= 1 {
            return;
        }
        let w = buffer.width() as usize;
        let h = buffer.height() as usize;
        let mut temp = self.temp.borrow_mut();

        if self.scale > 1 && w >= self.scale * 2 && h >= self.scale * 2 {
            let (sw, sh) = ((w / self.scale) as u32, (h / self.scale) as u32);
            let (fw, fh) = (w as u32, h as u32);
            if let Some(mut small) = resampled(buffer.data(), fw, fh, sw, sh) {
                separable_blur(&mut small, sw as usize, sh as usize, &self.small_kernel, &mut temp);
                if let Some(full) = resampled(&small, sw, sh, fw, fh) {
                    buffer.data_mut().copy_from_slice(&full);
                    return;
                }
            }
            log::debug!("Resampling failed; blurring {w}x{h} at full resolution");
        }
        separable_blur(buffer.data_mut(), w, h, &self.kernel, &mut temp);
    }
}
