use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::shared::color::clamp_channel;
use crate::shared::pixel_buffer::{PixelBuffer, CHANNELS};

/// Pixels with alpha below this are holes.
const HOLE_ALPHA: u8 = 50;
/// Pixels whose RGB sum is below this are holes too.
const HOLE_RGB_SUM: u32 = 30;

/// Patches holes (near-transparent or near-black interior pixels) with the
/// mean of their opaque 8-neighbours and makes them opaque.
///
/// Runs in place in raster order, so a patched pixel can feed the patch of
/// the next one. Holes with no opaque neighbour are left alone.
pub struct ContentAwareFill;

impl ContentAwareFill {
    fn is_hole(px: &[u8]) -> bool {
        px[3] < HOLE_ALPHA || (px[0] as u32 + px[1] as u32 + px[2] as u32) < HOLE_RGB_SUM
    }
}

impl PixelFilter for ContentAwareFill {
    fn name(&self) -> &str {
        "content-aware-fill"
    }

    fn apply(&self, buffer: &mut PixelBuffer) {
        let w = buffer.width() as usize;
        let h = buffer.height() as usize;
        if w < 3 || h < 3 {
            return;
        }
        let data = buffer.data_mut();

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let i = (y * w + x) * CHANNELS;
                if !Self::is_hole(&data[i..i + CHANNELS]) {
                    continue;
                }

                let mut sum = [0u32; 3];
                let mut count = 0u32;
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        if nx == x && ny == y {
                            continue;
                        }
                        let n = (ny * w + nx) * CHANNELS;
                        if data[n + 3] > HOLE_ALPHA {
                            sum[0] += data[n] as u32;
                            sum[1] += data[n + 1] as u32;
                            sum[2] += data[n + 2] as u32;
                            count += 1;
                        }
                    }
                }

                if count > 0 {
                    for c in 0..3 {
                        data[i + c] = clamp_channel(sum[c] as f64 / count as f64);
                    }
                    data[i + 3] = 255;
                }
            }
        }
    }
}
