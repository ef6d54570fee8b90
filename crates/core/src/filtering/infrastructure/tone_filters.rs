use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::shared::color::luminance;
use crate::shared::pixel_buffer::PixelBuffer;

use super::pixel_ops::{map_rgb, scale_rgb};

/// Brightness boost applied after Reinhard compression.
pub const HDR_BOOST: f64 = 1.2;

/// Luminance cutoffs (0-255) for shadow/highlight recovery.
pub const SHADOW_CUTOFF: f64 = 85.0;
pub const HIGHLIGHT_CUTOFF: f64 = 170.0;

/// HDR-style tone mapping: Reinhard `c / (1 + c)` on normalized channels,
/// rescaled by [`HDR_BOOST`].
pub struct HdrToneMap;

impl PixelFilter for HdrToneMap {
    fn name(&self) -> &str {
        "hdr"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let reinhard = |c: u8| {
            let n = c as f64 / 255.0;
            n / (1.0 + n) * 255.0 * HDR_BOOST
        };
        map_rgb(buffer, |r, g, b| [reinhard(r), reinhard(g), reinhard(b)]);
    }
}

/// Lifts shadows (x1.3) and pulls highlights (x0.9) using hard luminance
/// cutoffs. The cutoffs are not smoothed, so pixels straddling 85 or 170
/// jump discontinuously.
pub struct ShadowHighlightRecovery;

impl PixelFilter for ShadowHighlightRecovery {
    fn name(&self) -> &str {
        "shadow-highlight"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        map_rgb(buffer, |r, g, b| {
            let lum = luminance(r, g, b);
            if lum < SHADOW_CUTOFF {
                scale_rgb(r, g, b, 1.3)
            } else if lum > HIGHLIGHT_CUTOFF {
                scale_rgb(r, g, b, 0.9)
            } else {
                [r as f64, g as f64, b as f64]
            }
        });
    }
}

/// Luminance-adaptive enhancement: brightens darks, lifts mid-tones and
/// slightly darkens brights.
pub struct AiEnhance;

impl PixelFilter for AiEnhance {
    fn name(&self) -> &str {
        "ai-enhance"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        map_rgb(buffer, |r, g, b| {
            let lum = luminance(r, g, b) / 255.0;
            let factor = if lum < 0.3 {
                1.3
            } else if lum > 0.7 {
                0.9
            } else {
                1.1
            };
            scale_rgb(r, g, b, factor)
        });
    }
}

/// Warms up skin-like tones (red-dominant, moderately bright pixels).
pub struct FaceRetouch;

impl PixelFilter for FaceRetouch {
    fn name(&self) -> &str {
        "face-retouch"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        map_rgb(buffer, |r, g, b| {
            if r > 95 && g > 40 && b > 20 && r > g && r > b {
                [r as f64 * 1.05, g as f64 * 1.03, b as f64 * 1.02]
            } else {
                [r as f64, g as f64, b as f64]
            }
        });
    }
}

/// Slider-driven color adjustments, each in `[-100, 100]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorAdjustment {
    temperature: f64,
    tint: f64,
    highlights: f64,
    shadows: f64,
}

impl ColorAdjustment {
    pub fn new(temperature: f64, tint: f64, highlights: f64, shadows: f64) -> Self {
        let knob = |v: f64| v.clamp(-100.0, 100.0);
        Self {
            temperature: knob(temperature),
            tint: knob(tint),
            highlights: knob(highlights),
            shadows: knob(shadows),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.temperature == 0.0 && self.tint == 0.0 && self.highlights == 0.0 && self.shadows == 0.0
    }
}

impl PixelFilter for ColorAdjustment {
    fn name(&self) -> &str {
        "color-adjust"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        if self.is_identity() {
            return;
        }
        let unit = |v: f64| v.clamp(0.0, 255.0);
        map_rgb(buffer, |r, g, b| {
            let (mut r, mut g, mut b) = (r as f64, g as f64, b as f64);

            if self.temperature != 0.0 {
                let temp = self.temperature * 0.01;
                r = unit(r + temp * 30.0);
                b = unit(b - temp * 30.0);
            }
            if self.tint != 0.0 {
                g = unit(g + self.tint * 0.01 * 20.0);
            }

            let lum = (r * 0.299 + g * 0.587 + b * 0.114) / 255.0;
            if self.highlights != 0.0 && lum > 0.7 {
                let factor = 1.0 + self.highlights * 0.002;
                r = unit(r * factor);
                g = unit(g * factor);
                b = unit(b * factor);
            }
            if self.shadows != 0.0 && lum < 0.3 {
                let factor = 1.0 + self.shadows * 0.002;
                r = unit(r * factor);
                g = unit(g * factor);
                b = unit(b * factor);
            }
            [r, g, b]
        });
    }
}
