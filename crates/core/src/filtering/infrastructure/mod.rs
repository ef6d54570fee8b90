pub mod adjustments;
pub mod content_fill;
pub mod filter_factory;
pub mod gaussian_blur;
pub mod geometry;
pub mod lens_correction;
pub mod noise_filters;
mod pixel_ops;
pub mod stylistic_filters;
pub mod tone_filters;
