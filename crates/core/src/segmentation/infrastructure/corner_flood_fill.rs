use crate::edges::sobel::EdgeMap;
use crate::shared::color::manhattan_distance;
use crate::shared::mask::Mask;
use crate::shared::pixel_buffer::PixelBuffer;

/// A pixel joins a fill when its RGB is strictly closer than this to the
/// fill's seed color...
pub const MAX_SEED_DISTANCE: u32 = 50;
/// ...and its Sobel strength is strictly below this.
pub const MAX_EDGE_STRENGTH: f32 = 30.0;

/// Background mask grown from the four corners, in the order top-left,
/// top-right, bottom-left, bottom-right.
///
/// Each fill compares against its own corner's color. All fills share one
/// visited set, so a pixel is claimed by the first fill that reaches it and
/// later corners already inside an earlier fill are skipped.
pub fn corner_background_mask(buffer: &PixelBuffer, edges: &EdgeMap) -> Mask {
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let mut mask = Mask::new(buffer.width(), buffer.height());
    if w == 0 || h == 0 {
        return mask;
    }

    let corners = [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)];
    for (x, y) in corners {
        if mask.get(x, y) {
            continue;
        }
        fill_from(buffer, edges, x, y, &mut mask);
    }
    mask
}

/// Iterative 4-connected fill. The mask doubles as the visited set: only
/// admitted pixels are marked, and a marked pixel is never pushed again.
fn fill_from(buffer: &PixelBuffer, edges: &EdgeMap, x: usize, y: usize, mask: &mut Mask) {
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let seed = buffer.rgb(x, y);
    let mut stack = vec![(x, y)];

    while let Some((cx, cy)) = stack.pop() {
        let index = cy * w + cx;
        if mask.get_index(index) {
            continue;
        }
        let admitted = manhattan_distance(buffer.rgb(cx, cy), seed) < MAX_SEED_DISTANCE
            && edges.get_index(index) < MAX_EDGE_STRENGTH;
        if !admitted {
            continue;
        }
        mask.set_index(index, true);

        if cx + 1 < w && !mask.get_index(index + 1) {
            stack.push((cx + 1, cy));
        }
        if cx > 0 && !mask.get_index(index - 1) {
            stack.push((cx - 1, cy));
        }
        if cy + 1 < h && !mask.get_index(index + w) {
            stack.push((cx, cy + 1));
        }
        if cy > 0 && !mask.get_index(index - w) {
            stack.push((cx, cy - 1));
        }
    }
}

/// Fraction of background pixels in the `(2r+1)²` window around `(x, y)`,
/// counting only window cells that fall inside the frame.
pub fn background_fraction(mask: &Mask, x: usize, y: usize, radius: usize) -> f64 {
    let w = mask.width() as usize;
    let h = mask.height() as usize;
    let x0 = x.saturating_sub(radius);
    let y0 = y.saturating_sub(radius);
    let x1 = (x + radius).min(w - 1);
    let y1 = (y + radius).min(h - 1);

    let mut background = 0usize;
    for ny in y0..=y1 {
        for nx in x0..=x1 {
            if mask.get(nx, ny) {
                background += 1;
            }
        }
    }
    let total = (x1 - x0 + 1) * (y1 - y0 + 1);
    background as f64 / total as f64
}
