use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::filtering::domain::pixel_filter::PixelFilter;

use super::adjustments::{AdjustmentPipeline, Adjustments};
use super::content_fill::ContentAwareFill;
use super::gaussian_blur::GaussianBlur;
use super::geometry::{Flip, FlipAxis, Resize, Rotate, Rotation};
use super::lens_correction::{ChromaticAberrationCorrection, LensCorrection};
use super::noise_filters::{FilmGrain, Watercolor};
use super::stylistic_filters::{
    Pixelate, Posterize, Style, StyleFilter, Vignette, DEFAULT_PIXELATE_BLOCK,
    DEFAULT_POSTERIZE_LEVELS,
};
use super::tone_filters::{AiEnhance, ColorAdjustment, FaceRetouch, HdrToneMap, ShadowHighlightRecovery};

/// Every kernel the editor can run, addressed by its kebab-case name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Adjust,
    Hdr,
    ShadowHighlight,
    AiEnhance,
    FaceRetouch,
    ColorAdjust,
    LensCorrection,
    ChromaticAberration,
    Vintage,
    Cold,
    Warm,
    Dramatic,
    Soft,
    Vignette,
    Sketch,
    Solarize,
    Posterize,
    OilPainting,
    Watercolor,
    Grayscale,
    Negative,
    Emboss,
    Sharpen,
    Threshold,
    Pixelate,
    FilmGrain,
    GaussianBlur,
    ContentAwareFill,
    FlipHorizontal,
    FlipVertical,
    #[serde(rename = "rotate-90")]
    Rotate90,
    #[serde(rename = "rotate-180")]
    Rotate180,
    #[serde(rename = "rotate-270")]
    Rotate270,
    Resize,
}

impl FilterKind {
    pub const ALL: [FilterKind; 34] = [
        FilterKind::Adjust,
        FilterKind::Hdr,
        FilterKind::ShadowHighlight,
        FilterKind::AiEnhance,
        FilterKind::FaceRetouch,
        FilterKind::ColorAdjust,
        FilterKind::LensCorrection,
        FilterKind::ChromaticAberration,
        FilterKind::Vintage,
        FilterKind::Cold,
        FilterKind::Warm,
        FilterKind::Dramatic,
        FilterKind::Soft,
        FilterKind::Vignette,
        FilterKind::Sketch,
        FilterKind::Solarize,
        FilterKind::Posterize,
        FilterKind::OilPainting,
        FilterKind::Watercolor,
        FilterKind::Grayscale,
        FilterKind::Negative,
        FilterKind::Emboss,
        FilterKind::Sharpen,
        FilterKind::Threshold,
        FilterKind::Pixelate,
        FilterKind::FilmGrain,
        FilterKind::GaussianBlur,
        FilterKind::ContentAwareFill,
        FilterKind::FlipHorizontal,
        FilterKind::FlipVertical,
        FilterKind::Rotate90,
        FilterKind::Rotate180,
        FilterKind::Rotate270,
        FilterKind::Resize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Adjust => "adjust",
            FilterKind::Hdr => "hdr",
            FilterKind::ShadowHighlight => "shadow-highlight",
            FilterKind::AiEnhance => "ai-enhance",
            FilterKind::FaceRetouch => "face-retouch",
            FilterKind::ColorAdjust => "color-adjust",
            FilterKind::LensCorrection => "lens-correction",
            FilterKind::ChromaticAberration => "chromatic-aberration",
            FilterKind::Vintage => "vintage",
            FilterKind::Cold => "cold",
            FilterKind::Warm => "warm",
            FilterKind::Dramatic => "dramatic",
            FilterKind::Soft => "soft",
            FilterKind::Vignette => "vignette",
            FilterKind::Sketch => "sketch",
            FilterKind::Solarize => "solarize",
            FilterKind::Posterize => "posterize",
            FilterKind::OilPainting => "oil-painting",
            FilterKind::Watercolor => "watercolor",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Negative => "negative",
            FilterKind::Emboss => "emboss",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Threshold => "threshold",
            FilterKind::Pixelate => "pixelate",
            FilterKind::FilmGrain => "film-grain",
            FilterKind::GaussianBlur => "gaussian-blur",
            FilterKind::ContentAwareFill => "content-aware-fill",
            FilterKind::FlipHorizontal => "flip-horizontal",
            FilterKind::FlipVertical => "flip-vertical",
            FilterKind::Rotate90 => "rotate-90",
            FilterKind::Rotate180 => "rotate-180",
            FilterKind::Rotate270 => "rotate-270",
            FilterKind::Resize => "resize",
        }
    }

    /// Whether the kernel can change the buffer dimensions.
    pub fn reshapes(self) -> bool {
        matches!(self, FilterKind::Rotate90 | FilterKind::Rotate270 | FilterKind::Resize)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown filter '{0}'")]
pub struct UnknownFilterError(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FilterKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| UnknownFilterError(s.to_string()))
    }
}

/// Tunable parameters shared by all kernels. Each kernel reads only the
/// fields it needs; out-of-range values are clamped by the kernel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Percent in `[-100, 100]`.
    pub lens_strength: f64,
    /// Percent in `[0, 100]`.
    pub chromatic_strength: f64,
    pub posterize_levels: u32,
    pub pixelate_block: u32,
    pub grain_amount: f64,
    /// Gaussian blur length in pixels (the standard deviation).
    pub blur_px: f64,
    /// Slider values for `adjust`; `color-adjust` reads only temperature,
    /// tint, highlights and shadows.
    pub adjustments: Adjustments,
    /// Target size for `resize`, each in `[1, 5000]`. `None` keeps that
    /// dimension.
    pub resize_width: Option<u32>,
    pub resize_height: Option<u32>,
    /// Seed for the noise kernels.
    pub noise_seed: u64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            lens_strength: 0.0,
            chromatic_strength: 0.0,
            posterize_levels: DEFAULT_POSTERIZE_LEVELS,
            pixelate_block: DEFAULT_PIXELATE_BLOCK,
            grain_amount: 25.0,
            blur_px: 3.0,
            adjustments: Adjustments::default(),
            resize_width: None,
            resize_height: None,
            noise_seed: 0,
        }
    }
}

/// Builds the kernel for `kind`, configured from `settings`.
pub fn create_filter(kind: FilterKind, settings: &FilterSettings) -> Box<dyn PixelFilter> {
    log::debug!("Creating {} filter", kind);
    match kind {
        FilterKind::Adjust => Box::new(AdjustmentPipeline::new(settings.adjustments)),
        FilterKind::Hdr => Box::new(HdrToneMap),
        FilterKind::ShadowHighlight => Box::new(ShadowHighlightRecovery),
        FilterKind::AiEnhance => Box::new(AiEnhance),
        FilterKind::FaceRetouch => Box::new(FaceRetouch),
        FilterKind::ColorAdjust => {
            let a = &settings.adjustments;
            Box::new(ColorAdjustment::new(a.temperature, a.tint, a.highlights, a.shadows))
        }
        FilterKind::LensCorrection => Box::new(LensCorrection::new(settings.lens_strength)),
        FilterKind::ChromaticAberration => {
            Box::new(ChromaticAberrationCorrection::new(settings.chromatic_strength))
        }
        FilterKind::Vintage => Box::new(StyleFilter::new(Style::Vintage)),
        FilterKind::Cold => Box::new(StyleFilter::new(Style::Cold)),
        FilterKind::Warm => Box::new(StyleFilter::new(Style::Warm)),
        FilterKind::Dramatic => Box::new(StyleFilter::new(Style::Dramatic)),
        FilterKind::Soft => Box::new(StyleFilter::new(Style::Soft)),
        FilterKind::Vignette => Box::new(Vignette),
        FilterKind::Sketch => Box::new(StyleFilter::new(Style::Sketch)),
        FilterKind::Solarize => Box::new(StyleFilter::new(Style::Solarize)),
        FilterKind::Posterize => Box::new(Posterize::new(settings.posterize_levels)),
        FilterKind::OilPainting => Box::new(StyleFilter::new(Style::OilPainting)),
        FilterKind::Watercolor => Box::new(Watercolor::new(settings.noise_seed)),
        FilterKind::Grayscale => Box::new(StyleFilter::new(Style::Grayscale)),
        FilterKind::Negative => Box::new(StyleFilter::new(Style::Negative)),
        FilterKind::Emboss => Box::new(StyleFilter::new(Style::Emboss)),
        FilterKind::Sharpen => Box::new(StyleFilter::new(Style::Sharpen)),
        FilterKind::Threshold => Box::new(StyleFilter::new(Style::Threshold)),
        FilterKind::Pixelate => Box::new(Pixelate::new(settings.pixelate_block)),
        FilterKind::FilmGrain => Box::new(FilmGrain::new(settings.grain_amount, settings.noise_seed)),
        FilterKind::GaussianBlur => Box::new(GaussianBlur::new(settings.blur_px)),
        FilterKind::ContentAwareFill => Box::new(ContentAwareFill),
        FilterKind::FlipHorizontal => Box::new(Flip::new(FlipAxis::Horizontal)),
        FilterKind::FlipVertical => Box::new(Flip::new(FlipAxis::Vertical)),
        FilterKind::Rotate90 => Box::new(Rotate::new(Rotation::Quarter)),
        FilterKind::Rotate180 => Box::new(Rotate::new(Rotation::Half)),
        FilterKind::Rotate270 => Box::new(Rotate::new(Rotation::ThreeQuarter)),
        FilterKind::Resize => Box::new(Resize::new(settings.resize_width, settings.resize_height)),
    }
}
