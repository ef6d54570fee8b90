use crate::shared::color::mean_rgb;
use crate::shared::pixel_buffer::PixelBuffer;

/// Per-pixel Sobel gradient magnitudes. Border pixels are never scored and
/// stay at 0.
#[derive(Clone, Debug)]
pub struct EdgeMap {
    strengths: Vec<f32>,
    width: u32,
    height: u32,
}

impl EdgeMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.strengths[y * self.width as usize + x]
    }

    pub fn get_index(&self, index: usize) -> f32 {
        self.strengths[index]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.strengths
    }
}

/// Sobel gradient magnitude `sqrt(gx² + gy²)` at `(x, y)` over the
/// unweighted RGB mean of the 8-neighbourhood. Alpha is ignored.
///
/// Only defined for interior pixels (`1 <= x < w-1`, `1 <= y < h-1`).
pub fn edge_strength(buffer: &PixelBuffer, x: usize, y: usize) -> f32 {
    debug_assert!(
        x >= 1 && y >= 1 && x + 1 < buffer.width() as usize && y + 1 < buffer.height() as usize,
        "edge_strength is only defined for interior pixels"
    );
    let gray = |px: usize, py: usize| {
        let [r, g, b] = buffer.rgb(px, py);
        mean_rgb(r, g, b)
    };

    let tl = gray(x - 1, y - 1);
    let tc = gray(x, y - 1);
    let tr = gray(x + 1, y - 1);
    let ml = gray(x - 1, y);
    let mr = gray(x + 1, y);
    let bl = gray(x - 1, y + 1);
    let bc = gray(x, y + 1);
    let br = gray(x + 1, y + 1);

    let gx = -tl + tr - 2.0 * ml + 2.0 * mr - bl + br;
    let gy = -tl - 2.0 * tc - tr + bl + 2.0 * bc + br;

    (gx * gx + gy * gy).sqrt() as f32
}

/// Scores every interior pixel of `buffer`.
pub fn edge_map(buffer: &PixelBuffer) -> EdgeMap {
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let mut strengths = vec![0.0f32; w * h];

    if w >= 3 && h >= 3 {
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                strengths[y * w + x] = edge_strength(buffer, x, y);
            }
        }
    }

    EdgeMap {
        strengths,
        width: buffer.width(),
        height: buffer.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertical_step(width: u32, height: u32, split: usize) -> PixelBuffer {
        let mut buffer = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
        for y in 0..height as usize {
            for x in split..width as usize {
                buffer.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        buffer
    }

    #[test]
    fn test_uniform_image_has_zero_strength() {
        let buffer = PixelBuffer::filled(5, 5, [90, 120, 30, 255]);
        assert_relative_eq!(edge_strength(&buffer, 2, 2), 0.0);
    }

    #[test]
    fn test_vertical_step_edge() {
        // Columns 0..2 black, 2.. white: at x=2 left column is black,
        // right column white → gx = 4 * 255, gy = 0.
        let buffer = vertical_step(5, 5, 2);
        assert_relative_eq!(edge_strength(&buffer, 2, 2), 1020.0);
        assert_relative_eq!(edge_strength(&buffer, 1, 2), 1020.0);
        assert_relative_eq!(edge_strength(&buffer, 3, 2), 0.0);
    }

    #[test]
    fn test_horizontal_step_edge() {
        let mut buffer = PixelBuffer::filled(5, 5, [0, 0, 0, 255]);
        for x in 0..5 {
            buffer.set_pixel(x, 3, [255, 255, 255, 255]);
            buffer.set_pixel(x, 4, [255, 255, 255, 255]);
        }
        assert_relative_eq!(edge_strength(&buffer, 2, 2), 1020.0);
    }

    #[test]
    fn test_uses_unweighted_mean() {
        // Only the red channel differs: mean is 255/3 = 85 per bright pixel.
        let mut buffer = PixelBuffer::filled(3, 3, [0, 0, 0, 255]);
        for y in 0..3 {
            buffer.set_pixel(2, y, [255, 0, 0, 255]);
        }
        assert_relative_eq!(edge_strength(&buffer, 1, 1), 340.0, epsilon = 1e-3);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let mut buffer = PixelBuffer::filled(3, 3, [50, 50, 50, 255]);
        buffer.set_alpha(2, 1, 0);
        assert_relative_eq!(edge_strength(&buffer, 1, 1), 0.0);
    }

    #[test]
    fn test_edge_map_borders_are_zero() {
        let buffer = vertical_step(6, 6, 3);
        let map = edge_map(&buffer);
        for x in 0..6 {
            assert_relative_eq!(map.get(x, 0), 0.0);
            assert_relative_eq!(map.get(x, 5), 0.0);
        }
        for y in 0..6 {
            assert_relative_eq!(map.get(0, y), 0.0);
            assert_relative_eq!(map.get(5, y), 0.0);
        }
        assert!(map.get(3, 2) > 0.0);
    }

    #[test]
    fn test_edge_map_on_tiny_buffer_is_all_zero() {
        let buffer = PixelBuffer::filled(2, 2, [255, 0, 0, 255]);
        let map = edge_map(&buffer);
        assert_eq!(map.as_slice().len(), 4);
        assert!(map.as_slice().iter().all(|&v| v == 0.0));
    }
}
