use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

use crate::shared::color::clamp_channel;
use crate::shared::pixel_buffer::{PixelBuffer, CHANNELS};

/// Maps every pixel's RGB through `f`, clamping the result on store.
/// Alpha is left untouched.
pub fn map_rgb<F>(buffer: &mut PixelBuffer, f: F)
where
    F: Fn(u8, u8, u8) -> [f64; 3],
{
    for px in buffer.data_mut().chunks_exact_mut(CHANNELS) {
        let [r, g, b] = f(px[0], px[1], px[2]);
        px[0] = clamp_channel(r);
        px[1] = clamp_channel(g);
        px[2] = clamp_channel(b);
    }
}

/// Like [`map_rgb`] but also passes the pixel coordinates.
pub fn map_rgb_at<F>(buffer: &mut PixelBuffer, f: F)
where
    F: Fn(usize, usize, u8, u8, u8) -> [f64; 3],
{
    let w = buffer.width() as usize;
    for (i, px) in buffer.data_mut().chunks_exact_mut(CHANNELS).enumerate() {
        let [r, g, b] = f(i % w, i / w, px[0], px[1], px[2]);
        px[0] = clamp_channel(r);
        px[1] = clamp_channel(g);
        px[2] = clamp_channel(b);
    }
}

/// Scales RGB by a single factor.
pub fn scale_rgb(r: u8, g: u8, b: u8, factor: f64) -> [f64; 3] {
    [r as f64 * factor, g as f64 * factor, b as f64 * factor]
}

/// Resamples RGBA bytes with a triangle (bilinear) filter. `None` if `data`
/// is shorter than `width x height` pixels.
pub fn resampled(data: &[u8], width: u32, height: u32, new_w: u32, new_h: u32) -> Option<Vec<u8>> {
    let view = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(width, height, data)?;
    Some(imageops::resize(&view, new_w, new_h, FilterType::Triangle).into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_rgb_preserves_alpha() {
        let mut buffer = PixelBuffer::filled(2, 2, [10, 20, 30, 77]);
        map_rgb(&mut buffer, |r, g, b| [r as f64 * 2.0, g as f64, b as f64 - 100.0]);
        assert_eq!(buffer.pixel(1, 1), [20, 20, 0, 77]);
    }

    #[test]
    fn test_map_rgb_at_reports_coordinates() {
        let mut buffer = PixelBuffer::filled(3, 2, [0, 0, 0, 255]);
        map_rgb_at(&mut buffer, |x, y, _, _, _| [x as f64, y as f64, 0.0]);
        assert_eq!(buffer.rgb(2, 1), [2, 1, 0]);
        assert_eq!(buffer.rgb(0, 1), [0, 1, 0]);
    }
}
