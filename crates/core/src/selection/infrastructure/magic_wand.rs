use crate::selection::domain::selection::{SelectionError, WandSelection};
use crate::shared::color::manhattan_distance;
use crate::shared::mask::Mask;
use crate::shared::pixel_buffer::PixelBuffer;
use crate::shared::region::{Point, Region};

/// Selects the 4-connected region of pixels whose RGB lies within
/// `tolerance * 3` (Manhattan) of the seed pixel's color.
///
/// The fill uses an explicit stack and marks each admitted pixel once, so
/// it terminates on any image size. Alpha is ignored.
pub fn magic_wand_select(
    buffer: &PixelBuffer,
    seed: Point,
    tolerance: u8,
) -> Result<WandSelection, SelectionError> {
    if !buffer.contains(seed) {
        return Err(SelectionError::SeedOutOfBounds {
            x: seed.x,
            y: seed.y,
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let limit = tolerance as u32 * 3;
    let (sx, sy) = (seed.x as usize, seed.y as usize);
    let target = buffer.rgb(sx, sy);

    let mut mask = Mask::new(buffer.width(), buffer.height());
    let mut pixel_count = 0usize;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (sx, sx, sy, sy);
    let mut stack = vec![(sx, sy)];

    while let Some((x, y)) = stack.pop() {
        let index = y * w + x;
        if mask.get_index(index) || manhattan_distance(buffer.rgb(x, y), target) > limit {
            continue;
        }
        mask.set_index(index, true);
        pixel_count += 1;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);

        if x + 1 < w {
            stack.push((x + 1, y));
        }
        if x > 0 {
            stack.push((x - 1, y));
        }
        if y + 1 < h {
            stack.push((x, y + 1));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
    }

    let region = Region::new(
        min_x as i32,
        min_y as i32,
        (max_x - min_x + 1) as i32,
        (max_y - min_y + 1) as i32,
    );
    log::debug!("Magic wand selected {} pixels in {:?}", pixel_count, region);

    Ok(WandSelection {
        region,
        mask,
        pixel_count,
    })
}
