use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::shared::pixel_buffer::PixelBuffer;

use super::gaussian_blur::GaussianBlur;
use super::pixel_ops::map_rgb;
use super::tone_filters::ColorAdjustment;

/// The editor's slider values. Zero everywhere is the identity.
///
/// Percent knobs (`brightness`, `contrast`, `saturation`, `exposure`,
/// `vibrance`, `temperature`, `tint`, `highlights`, `shadows`) range over
/// `[-100, 100]`; `sepia` and `invert` over `[0, 100]`; `hue` is in degrees
/// and `blur` is a length in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub exposure: f64,
    pub highlights: f64,
    pub shadows: f64,
    pub hue: f64,
    pub temperature: f64,
    pub tint: f64,
    pub vibrance: f64,
    pub sepia: f64,
    pub invert: f64,
    pub blur: f64,
}

impl Adjustments {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

type Matrix = [[f64; 3]; 3];

/// One CSS filter function, in `[0, 255]` channel space.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    /// `brightness(a)`
    Scale(f64),
    /// `contrast(a)`
    Contrast(f64),
    /// `saturate`, `hue-rotate` and `sepia` are colour matrices.
    Matrix(Matrix),
    /// `invert(a)`
    Invert(f64),
}

impl Stage {
    fn apply(&self, [r, g, b]: [f64; 3]) -> [f64; 3] {
        let out = match self {
            Stage::Scale(a) => [r * a, g * a, b * a],
            Stage::Contrast(a) => {
                let c = |v: f64| (v - 127.5) * a + 127.5;
                [c(r), c(g), c(b)]
            }
            Stage::Matrix(m) => {
                let row = |i: usize| m[i][0] * r + m[i][1] * g + m[i][2] * b;
                [row(0), row(1), row(2)]
            }
            Stage::Invert(a) => {
                let c = |v: f64| v * (1.0 - a) + (255.0 - v) * a;
                [c(r), c(g), c(b)]
            }
        };
        out.map(|v| v.clamp(0.0, 255.0))
    }
}

fn saturate_matrix(s: f64) -> Matrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(degrees: f64) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn sepia_matrix(amount: f64) -> Matrix {
    let k = 1.0 - amount;
    [
        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
    ]
}

/// Runs the slider pipeline in the editor's order:
/// `brightness(100 + brightness + exposure * 0.5 %)`, `contrast`,
/// `saturate(100 + saturation + vibrance * 0.3 %)`, `hue-rotate`, `sepia`,
/// `invert`, `blur`, then the temperature/tint/highlights/shadows pass.
///
/// Each stage clamps to `[0, 255]`; the result is rounded once on store.
pub struct AdjustmentPipeline {
    stages: Vec<Stage>,
    blur: GaussianBlur,
    color: ColorAdjustment,
}

impl AdjustmentPipeline {
    pub fn new(adjustments: Adjustments) -> Self {
        let knob = |v: f64| if v.is_finite() { v.clamp(-100.0, 100.0) } else { 0.0 };
        let unit = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) / 100.0 } else { 0.0 };
        let a = adjustments;

        let brightness = (100.0 + knob(a.brightness) + knob(a.exposure) * 0.5) / 100.0;
        let contrast = (100.0 + knob(a.contrast)) / 100.0;
        let saturation = (100.0 + knob(a.saturation) + knob(a.vibrance) * 0.3) / 100.0;
        let hue = if a.hue.is_finite() { a.hue % 360.0 } else { 0.0 };
        let sepia = unit(a.sepia);
        let invert = unit(a.invert);

        let mut stages = Vec::new();
        if brightness != 1.0 {
            stages.push(Stage::Scale(brightness.max(0.0)));
        }
        if contrast != 1.0 {
            stages.push(Stage::Contrast(contrast.max(0.0)));
        }
        if saturation != 1.0 {
            stages.push(Stage::Matrix(saturate_matrix(saturation.max(0.0))));
        }
        if hue != 0.0 {
            stages.push(Stage::Matrix(hue_rotate_matrix(hue)));
        }
        if sepia > 0.0 {
            stages.push(Stage::Matrix(sepia_matrix(sepia)));
        }
        if invert > 0.0 {
            stages.push(Stage::Invert(invert));
        }

        Self {
            stages,
            blur: GaussianBlur::new(a.blur),
            color: ColorAdjustment::new(a.temperature, a.tint, a.highlights, a.shadows),
        }
    }
}

impl PixelFilter for AdjustmentPipeline {
    fn name(&self) -> &str {
        "adjust"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        if !self.stages.is_empty() {
            map_rgb(buffer, |r, g, b| {
                self.stages
                    .iter()
                    .fold([r as f64, g as f64, b as f64], |rgb, stage| stage.apply(rgb))
            });
        }
        self.blur.apply(buffer);
        self.color.apply(buffer);
    }
}

/// Named slider combinations. Applying one starts from all-zero sliders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Vintage,
    Bw,
    Warm,
    Cool,
    Cinematic,
    Natural,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Vintage,
        Preset::Bw,
        Preset::Warm,
        Preset::Cool,
        Preset::Cinematic,
        Preset::Natural,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Vintage => "vintage",
            Preset::Bw => "bw",
            Preset::Warm => "warm",
            Preset::Cool => "cool",
            Preset::Cinematic => "cinematic",
            Preset::Natural => "natural",
        }
    }

    pub fn adjustments(self) -> Adjustments {
        let base = Adjustments::default();
        match self {
            Preset::Vintage => Adjustments {
                sepia: 60.0,
                contrast: -10.0,
                brightness: 10.0,
                temperature: 20.0,
                saturation: -20.0,
                ..base
            },
            Preset::Bw => Adjustments {
                saturation: -100.0,
                contrast: 25.0,
                brightness: 5.0,
                ..base
            },
            Preset::Warm => Adjustments {
                temperature: 40.0,
                tint: 10.0,
                vibrance: 15.0,
                brightness: 8.0,
                saturation: 10.0,
                ..base
            },
            Preset::Cool => Adjustments {
                temperature: -35.0,
                tint: -8.0,
                vibrance: 12.0,
                brightness: -3.0,
                contrast: 15.0,
                ..base
            },
            Preset::Cinematic => Adjustments {
                contrast: 30.0,
                saturation: -15.0,
                shadows: -20.0,
                highlights: -10.0,
                temperature: 15.0,
                ..base
            },
            Preset::Natural => Adjustments {
                vibrance: 20.0,
                shadows: 10.0,
                highlights: -5.0,
                contrast: 10.0,
                saturation: 5.0,
                ..base
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown preset '{0}' (expected one of: vintage, bw, warm, cool, cinematic, natural)")]
pub struct UnknownPresetError(pub String);

impl FromStr for Preset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| UnknownPresetError(s.to_string()))
    }
}
