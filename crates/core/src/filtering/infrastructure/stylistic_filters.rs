use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::shared::color::{luminance, mean_rgb};
use crate::shared::pixel_buffer::{PixelBuffer, CHANNELS};

use super::pixel_ops::{map_rgb, map_rgb_at, scale_rgb};

pub const DEFAULT_POSTERIZE_LEVELS: u32 = 8;
pub const DEFAULT_PIXELATE_BLOCK: u32 = 8;

/// Darkening at the farthest corner of a vignette (1.0 - 0.6).
const VIGNETTE_STRENGTH: f64 = 0.6;

/// Point-wise looks: each output pixel depends only on the same input pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Vintage,
    Cold,
    Warm,
    Dramatic,
    Soft,
    Sketch,
    Solarize,
    OilPainting,
    Grayscale,
    Negative,
    Emboss,
    Sharpen,
    Threshold,
}

impl Style {
    fn name(self) -> &'static str {
        match self {
            Style::Vintage => "vintage",
            Style::Cold => "cold",
            Style::Warm => "warm",
            Style::Dramatic => "dramatic",
            Style::Soft => "soft",
            Style::Sketch => "sketch",
            Style::Solarize => "solarize",
            Style::OilPainting => "oil-painting",
            Style::Grayscale => "grayscale",
            Style::Negative => "negative",
            Style::Emboss => "emboss",
            Style::Sharpen => "sharpen",
            Style::Threshold => "threshold",
        }
    }

    fn map(self, r: u8, g: u8, b: u8) -> [f64; 3] {
        let (rf, gf, bf) = (r as f64, g as f64, b as f64);
        match self {
            Style::Vintage => [rf * 1.1 + 20.0, gf * 0.9 + 10.0, bf * 0.8],
            Style::Cold => [rf * 0.8, gf * 1.1, bf * 1.2],
            Style::Warm => [rf * 1.2, gf * 1.1, bf * 0.8],
            Style::Dramatic => {
                let factor = if mean_rgb(r, g, b) > 128.0 { 1.3 } else { 0.7 };
                scale_rgb(r, g, b, factor)
            }
            Style::Soft => [rf * 0.9 + 25.0, gf * 0.9 + 25.0, bf * 0.9 + 25.0],
            Style::Sketch => {
                let gray = luminance(r, g, b);
                let v = if gray > 128.0 {
                    255.0
                } else if gray < 64.0 {
                    0.0
                } else {
                    gray * 2.0
                };
                [v; 3]
            }
            Style::Solarize => {
                let solar = |c: u8| if c > 128 { 255.0 - c as f64 } else { c as f64 };
                [solar(r), solar(g), solar(b)]
            }
            Style::OilPainting => [rf * 0.8 + 30.0, gf * 0.8 + 20.0, bf * 0.8 + 10.0],
            Style::Grayscale => [luminance(r, g, b); 3],
            Style::Negative => [255.0 - rf, 255.0 - gf, 255.0 - bf],
            Style::Emboss => [luminance(r, g, b) + 128.0; 3],
            Style::Sharpen => scale_rgb(r, g, b, 1.2),
            Style::Threshold => {
                let v = if luminance(r, g, b) > 128.0 { 255.0 } else { 0.0 };
                [v; 3]
            }
        }
    }
}

pub struct StyleFilter {
    style: Style,
}

impl StyleFilter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }
}

impl PixelFilter for StyleFilter {
    fn name(&self) -> &str {
        self.style.name()
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let style = self.style;
        map_rgb(buffer, |r, g, b| style.map(r, g, b));
    }
}

/// Quantizes each channel to `floor(c / step) * step` with
/// `step = 255 / levels`.
pub struct Posterize {
    levels: u32,
}

impl Posterize {
    pub fn new(levels: u32) -> Self {
        Self {
            levels: levels.clamp(2, 255),
        }
    }
}

impl Default for Posterize {
    fn default() -> Self {
        Self::new(DEFAULT_POSTERIZE_LEVELS)
    }
}

impl PixelFilter for Posterize {
    fn name(&self) -> &str {
        "posterize"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let step = 255.0 / self.levels as f64;
        let quantize = |c: u8| (c as f64 / step).floor() * step;
        map_rgb(buffer, |r, g, b| [quantize(r), quantize(g), quantize(b)]);
    }
}

/// Radial darkening: `1 - (d / max_d) * 0.6`, measured from `(w/2, h/2)`.
pub struct Vignette;

impl PixelFilter for Vignette {
    fn name(&self) -> &str {
        "vignette"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let cx = buffer.width() as f64 / 2.0;
        let cy = buffer.height() as f64 / 2.0;
        let max_distance = (cx * cx + cy * cy).sqrt();
        if max_distance == 0.0 {
            return;
        }
        map_rgb_at(buffer, |x, y, r, g, b| {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let distance = (dx * dx + dy * dy).sqrt();
            scale_rgb(r, g, b, 1.0 - distance / max_distance * VIGNETTE_STRENGTH)
        });
    }
}

/// Block mosaic: every `block x block` tile takes the color of its
/// top-left pixel. Edge tiles are clipped to the frame.
pub struct Pixelate {
    block: usize,
}

impl Pixelate {
    pub fn new(block: u32) -> Self {
        Self {
            block: block.max(1) as usize,
        }
    }
}

impl Default for Pixelate {
    fn default() -> Self {
        Self::new(DEFAULT_PIXELATE_BLOCK)
    }
}

impl PixelFilter for Pixelate {
    fn name(&self) -> &str {
        "pixelate"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let w = buffer.width() as usize;
        let h = buffer.height() as usize;
        let block = self.block;
        let data = buffer.data_mut();

        for ty in (0..h).step_by(block) {
            for tx in (0..w).step_by(block) {
                let anchor = (ty * w + tx) * CHANNELS;
                let mut rgb = [0u8; 3];
                rgb.copy_from_slice(&data[anchor..anchor + 3]);
                for y in ty..(ty + block).min(h) {
                    for x in tx..(tx + block).min(w) {
                        let i = (y * w + x) * CHANNELS;
                        data[i..i + 3].copy_from_slice(&rgb);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(filter: &dyn PixelFilter, rgb: [u8; 3]) -> [u8; 3] {
        let mut buffer = PixelBuffer::filled(1, 1, [rgb[0], rgb[1], rgb[2], 255]);
        filter.apply(&mut buffer);
        buffer.rgb(0, 0)
    }

    #[rstest]
    #[case::vintage(Style::Vintage, [100, 100, 100], [130, 100, 80])]
    #[case::vintage_clamps(Style::Vintage, [250, 0, 0], [255, 10, 0])]
    #[case::cold(Style::Cold, [100, 100, 100], [80, 110, 120])]
    #[case::warm(Style::Warm, [100, 100, 100], [120, 110, 80])]
    #[case::dramatic_bright(Style::Dramatic, [150, 150, 150], [195, 195, 195])]
    #[case::dramatic_dark(Style::Dramatic, [100, 100, 100], [70, 70, 70])]
    #[case::soft(Style::Soft, [100, 0, 200], [115, 25, 205])]
    #[case::sketch_bright(Style::Sketch, [200, 200, 200], [255, 255, 255])]
    #[case::sketch_dark(Style::Sketch, [30, 30, 30], [0, 0, 0])]
    #[case::sketch_mid(Style::Sketch, [100, 100, 100], [200, 200, 200])]
    #[case::solarize(Style::Solarize, [200, 100, 129], [55, 100, 126])]
    #[case::oil_painting(Style::OilPainting, [100, 100, 100], [110, 100, 90])]
    #[case::grayscale(Style::Grayscale, [90, 90, 90], [90, 90, 90])]
    #[case::negative(Style::Negative, [0, 100, 255], [255, 155, 0])]
    #[case::emboss(Style::Emboss, [50, 50, 50], [178, 178, 178])]
    #[case::sharpen(Style::Sharpen, [100, 250, 0], [120, 255, 0])]
    #[case::threshold_high(Style::Threshold, [200, 200, 200], [255, 255, 255])]
    #[case::threshold_low(Style::Threshold, [20, 20, 20], [0, 0, 0])]
    fn test_style(#[case] style: Style, #[case] input: [u8; 3], #[case] expected: [u8; 3]) {
        assert_eq!(run(&StyleFilter::new(style), input), expected);
    }

    #[test]
    fn test_style_preserves_alpha() {
        let mut buffer = PixelBuffer::filled(2, 2, [10, 200, 30, 9]);
        StyleFilter::new(Style::Negative).apply(&mut buffer);
        assert!(buffer.data().chunks_exact(CHANNELS).all(|px| px[3] == 9));
    }

    // ── Posterize ────────────────────────────────────────────────────

    #[test]
    fn test_posterize_rounds_stored_value() {
        // step 31.875: floor(200 / 31.875) = 6 → 191.25, stored as 191.
        assert_eq!(run(&Posterize::default(), [200, 0, 255]), [191, 0, 255]);
    }

    #[test]
    fn test_posterize_levels_are_clamped() {
        // levels 1 → 2, step 127.5; 200 → 127.5 → 128 (half to even).
        assert_eq!(run(&Posterize::new(1), [200, 100, 0]), [128, 0, 0]);
    }

    // ── Vignette ─────────────────────────────────────────────────────

    #[test]
    fn test_vignette_center_pixel_unchanged() {
        let mut buffer = PixelBuffer::filled(10, 10, [200, 150, 100, 255]);
        Vignette.apply(&mut buffer);
        assert_eq!(buffer.rgb(5, 5), [200, 150, 100]);
    }

    #[test]
    fn test_vignette_darkens_corners() {
        let mut buffer = PixelBuffer::filled(10, 10, [200, 200, 200, 255]);
        Vignette.apply(&mut buffer);
        // (0,0) is exactly max distance from (5,5): factor 0.4.
        assert_eq!(buffer.rgb(0, 0), [80, 80, 80]);
        assert!(buffer.rgb(2, 2)[0] < 200);
        assert!(buffer.rgb(2, 2)[0] > 80);
    }

    // ── Pixelate ─────────────────────────────────────────────────────

    #[test]
    fn test_pixelate_uses_top_left_sample() {
        let mut buffer = PixelBuffer::filled(4, 4, [0, 0, 0, 255]);
        for y in 0..4 {
            for x in 0..4 {
                buffer.set_pixel(x, y, [(x * 10) as u8, (y * 10) as u8, 5, 255]);
            }
        }
        Pixelate::new(2).apply(&mut buffer);
        assert_eq!(buffer.rgb(1, 1), [0, 0, 5]);
        assert_eq!(buffer.rgb(3, 1), [20, 0, 5]);
        assert_eq!(buffer.rgb(3, 3), [20, 20, 5]);
    }

    #[test]
    fn test_pixelate_clips_partial_tiles() {
        let mut buffer = PixelBuffer::filled(5, 3, [0, 0, 0, 255]);
        buffer.set_pixel(4, 0, [99, 99, 99, 255]);
        Pixelate::new(4).apply(&mut buffer);
        assert_eq!(buffer.rgb(4, 2), [99, 99, 99]);
        assert_eq!(buffer.width(), 5);
    }
}
