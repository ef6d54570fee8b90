use crate::edges::sobel::edge_map;
use crate::segmentation::domain::background_remover::{
    BackgroundMethod, BackgroundRemover, SegmentationReport, MAX_FEATHER,
};
use crate::shared::color::clamp_channel;
use crate::shared::pixel_buffer::PixelBuffer;

use super::corner_flood_fill::{background_fraction, corner_background_mask};

/// Corner-seeded background removal with feathered edges.
///
/// Background pixels deep inside the fill become fully transparent; those
/// near the subject keep part of their alpha in proportion to how much of
/// their feather window is foreground.
pub struct SmartRemover {
    feather: usize,
}

impl SmartRemover {
    pub fn new(feather: u32) -> Self {
        Self {
            feather: feather.min(MAX_FEATHER) as usize,
        }
    }
}

impl BackgroundRemover for SmartRemover {
    fn method(&self) -> BackgroundMethod {
        BackgroundMethod::Smart
    }

    fn remove(&self, buffer: &mut PixelBuffer) -> SegmentationReport {
        let mut report = SegmentationReport::default();
        if buffer.pixel_count() == 0 {
            return report;
        }

        let edges = edge_map(buffer);
        let mask = corner_background_mask(buffer, &edges);
        log::debug!(
            "Smart fill marked {} of {} pixels as background",
            mask.count(),
            buffer.pixel_count()
        );

        let w = buffer.width() as usize;
        for (index, _) in mask.as_slice().iter().enumerate().filter(|(_, &bg)| bg) {
            let (x, y) = (index % w, index / w);
            let fraction = background_fraction(&mask, x, y, self.feather);
            let before = buffer.alpha(x, y);
            let after = clamp_channel(before as f64 * (1.0 - fraction));
            buffer.set_alpha(x, y, after);
            report.record(before, after);
        }
        report
    }
}
