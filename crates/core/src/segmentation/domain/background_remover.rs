use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::pixel_buffer::PixelBuffer;

pub const DEFAULT_TOLERANCE: u32 = 30;
pub const DEFAULT_FEATHER: u32 = 5;
pub const MAX_TOLERANCE: u32 = 765;
pub const MAX_FEATHER: u32 = 50;

/// How many pixels a removal pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentationReport {
    /// Pixels that went from visible to fully transparent.
    pub cleared: usize,
    /// Pixels whose alpha was reduced but not to zero.
    pub feathered: usize,
}

impl SegmentationReport {
    pub fn changed(&self) -> usize {
        self.cleared + self.feathered
    }

    /// Records the transition of one pixel's alpha from `before` to `after`.
    pub fn record(&mut self, before: u8, after: u8) {
        if before == after {
            return;
        }
        if after == 0 {
            self.cleared += 1;
        } else {
            self.feathered += 1;
        }
    }
}

/// Domain interface for background removal.
///
/// Implementations only ever lower alpha; color channels are untouched.
pub trait BackgroundRemover: Send {
    fn method(&self) -> BackgroundMethod;

    fn remove(&self, buffer: &mut PixelBuffer) -> SegmentationReport;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundMethod {
    /// Near-white pixels.
    Simple,
    /// Corner-seeded flood fill with feathered edges.
    #[default]
    Smart,
    /// Flat, bright interior regions.
    Edge,
    /// Pixels close to the top-left or bottom-right color.
    Color,
}

impl BackgroundMethod {
    pub fn name(self) -> &'static str {
        match self {
            BackgroundMethod::Simple => "simple",
            BackgroundMethod::Smart => "smart",
            BackgroundMethod::Edge => "edge",
            BackgroundMethod::Color => "color",
        }
    }
}

impl fmt::Display for BackgroundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown background removal method '{0}' (expected simple, smart, edge or color)")]
pub struct UnknownMethodError(pub String);

impl FromStr for BackgroundMethod {
    type Err = UnknownMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(BackgroundMethod::Simple),
            "smart" => Ok(BackgroundMethod::Smart),
            "edge" => Ok(BackgroundMethod::Edge),
            "color" => Ok(BackgroundMethod::Color),
            _ => Err(UnknownMethodError(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    pub method: BackgroundMethod,
    /// Manhattan RGB distance used by the color method, `[0, 765]`.
    pub tolerance: u32,
    /// Feather window radius used by the smart method, `[0, 50]`.
    pub feather: u32,
}

impl BackgroundSettings {
    /// Copy with `tolerance` and `feather` clamped to their ranges.
    pub fn clamped(self) -> Self {
        Self {
            method: self.method,
            tolerance: self.tolerance.min(MAX_TOLERANCE),
            feather: self.feather.min(MAX_FEATHER),
        }
    }
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            method: BackgroundMethod::Smart,
            tolerance: DEFAULT_TOLERANCE,
            feather: DEFAULT_FEATHER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_report_records_transitions() {
        let mut report = SegmentationReport::default();
        report.record(255, 0);
        report.record(255, 128);
        report.record(0, 0);
        report.record(40, 40);
        assert_eq!(report, SegmentationReport { cleared: 1, feathered: 1 });
        assert_eq!(report.changed(), 2);
    }

    #[rstest]
    #[case::simple("simple", BackgroundMethod::Simple)]
    #[case::smart("smart", BackgroundMethod::Smart)]
    #[case::edge("EDGE", BackgroundMethod::Edge)]
    #[case::color(" color ", BackgroundMethod::Color)]
    fn test_method_from_str(#[case] input: &str, #[case] expected: BackgroundMethod) {
        assert_eq!(input.parse::<BackgroundMethod>(), Ok(expected));
    }

    #[test]
    fn test_method_from_str_rejects_unknown() {
        assert!("magic".parse::<BackgroundMethod>().is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = BackgroundSettings::default();
        assert_eq!(settings.method, BackgroundMethod::Smart);
        assert_eq!(settings.tolerance, 30);
        assert_eq!(settings.feather, 5);
    }

    #[test]
    fn test_clamped() {
        let settings = BackgroundSettings {
            method: BackgroundMethod::Color,
            tolerance: 9999,
            feather: 500,
        }
        .clamped();
        assert_eq!(settings.tolerance, MAX_TOLERANCE);
        assert_eq!(settings.feather, MAX_FEATHER);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: BackgroundSettings = serde_json::from_str(r#"{"method":"color"}"#).unwrap();
        assert_eq!(settings.method, BackgroundMethod::Color);
        assert_eq!(settings.tolerance, DEFAULT_TOLERANCE);
    }
}
