use crate::edges::sobel::edge_map;
use crate::segmentation::domain::background_remover::{
    BackgroundMethod, BackgroundRemover, SegmentationReport, MAX_TOLERANCE,
};
use crate::shared::color::manhattan_distance;
use crate::shared::pixel_buffer::{PixelBuffer, CHANNELS};

/// Every channel must exceed this for the simple method.
const NEAR_WHITE: u8 = 200;
/// The edge method only clears pixels flatter than this...
const FLAT_EDGE_STRENGTH: f32 = 20.0;
/// ...that have at least one channel brighter than this.
const BRIGHT_CHANNEL: u8 = 180;

fn clear(px: &mut [u8], report: &mut SegmentationReport) {
    report.record(px[3], 0);
    px[3] = 0;
}

/// Clears near-white pixels.
pub struct SimpleRemover;

impl BackgroundRemover for SimpleRemover {
    fn method(&self) -> BackgroundMethod {
        BackgroundMethod::Simple
    }

    fn remove(&self, buffer: &mut PixelBuffer) -> SegmentationReport {
        let mut report = SegmentationReport::default();
        for px in buffer.data_mut().chunks_exact_mut(CHANNELS) {
            if px[0] > NEAR_WHITE && px[1] > NEAR_WHITE && px[2] > NEAR_WHITE {
                clear(px, &mut report);
            }
        }
        report
    }
}

/// Clears flat, bright interior pixels. Border pixels have no Sobel score
/// and are never touched.
pub struct EdgeRemover;

impl BackgroundRemover for EdgeRemover {
    fn method(&self) -> BackgroundMethod {
        BackgroundMethod::Edge
    }

    fn remove(&self, buffer: &mut PixelBuffer) -> SegmentationReport {
        let mut report = SegmentationReport::default();
        let w = buffer.width() as usize;
        let h = buffer.height() as usize;
        if w < 3 || h < 3 {
            return report;
        }

        // Sobel ignores alpha, so scoring up front matches scoring as we go.
        let edges = edge_map(buffer);
        let data = buffer.data_mut();
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let index = y * w + x;
                if edges.get_index(index) >= FLAT_EDGE_STRENGTH {
                    continue;
                }
                let px = &mut data[index * CHANNELS..(index + 1) * CHANNELS];
                if px[..3].iter().any(|&c| c > BRIGHT_CHANNEL) {
                    clear(px, &mut report);
                }
            }
        }
        report
    }
}

/// Clears pixels within `tolerance` (Manhattan RGB) of the first or last
/// pixel of the buffer.
pub struct ColorRemover {
    tolerance: u32,
}

impl ColorRemover {
    pub fn new(tolerance: u32) -> Self {
        Self {
            tolerance: tolerance.min(MAX_TOLERANCE),
        }
    }
}

impl BackgroundRemover for ColorRemover {
    fn method(&self) -> BackgroundMethod {
        BackgroundMethod::Color
    }

    fn remove(&self, buffer: &mut PixelBuffer) -> SegmentationReport {
        let mut report = SegmentationReport::default();
        let n = buffer.pixel_count();
        if n == 0 {
            return report;
        }
        let w = buffer.width() as usize;
        let references = [buffer.rgb(0, 0), buffer.rgb((n - 1) % w, (n - 1) / w)];

        for px in buffer.data_mut().chunks_exact_mut(CHANNELS) {
            let rgb = [px[0], px[1], px[2]];
            if references
                .iter()
                .any(|&reference| manhattan_distance(rgb, reference) < self.tolerance)
            {
                clear(px, &mut report);
            }
        }
        report
    }
}
