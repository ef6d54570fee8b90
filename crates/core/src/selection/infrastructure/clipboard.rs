use crate::selection::domain::selection::Selection;
use crate::shared::mask::Mask;
use crate::shared::pixel_buffer::PixelBuffer;
use crate::shared::region::Region;

/// Pixels lifted out of a selection, ready to paste.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipboardImage {
    pixels: PixelBuffer,
    /// Which clip pixels belong to a wand selection, in clip coordinates.
    /// `None` for rectangle selections, where every pixel is a member.
    members: Option<Mask>,
    /// Where the pixels were copied from.
    origin: Region,
}

impl ClipboardImage {
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn origin(&self) -> Region {
        self.origin
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether clip pixel `(x, y)` was part of the copied selection.
    pub fn is_member(&self, x: usize, y: usize) -> bool {
        self.members.as_ref().map_or(true, |m| m.get(x, y))
    }
}

/// Copies the selected rectangle (clipped to the buffer). For wand
/// selections the membership mask travels with the clip; non-member pixels
/// are stored fully transparent.
///
/// Returns `None` when nothing is selected or the selection lies entirely
/// off the buffer.
pub fn copy_selection(buffer: &PixelBuffer, selection: &Selection) -> Option<ClipboardImage> {
    let region = selection.region()?.clipped(buffer.width(), buffer.height());
    if region.is_empty() {
        return None;
    }

    let mut pixels = buffer.crop(&region);
    let members = selection.mask().map(|_| {
        let mut members = Mask::new(region.width as u32, region.height as u32);
        for y in 0..region.height {
            for x in 0..region.width {
                if selection.contains(region.x + x, region.y + y) {
                    members.set(x as usize, y as usize, true);
                } else {
                    pixels.set_pixel(x as usize, y as usize, [0, 0, 0, 0]);
                }
            }
        }
        members
    });

    Some(ClipboardImage {
        pixels,
        members,
        origin: region,
    })
}

/// Writes `clip` centred on `buffer` (top-left at `floor((W-w)/2)`,
/// `floor((H-h)/2)`), clipping whatever does not fit. Only member pixels
/// are written, so a wand clip leaves the rest of its box untouched.
/// Returns the bounding region written.
pub fn paste_centered(buffer: &mut PixelBuffer, clip: &ClipboardImage) -> Region {
    let x = (buffer.width() as i32 - clip.width() as i32).div_euclid(2);
    let y = (buffer.height() as i32 - clip.height() as i32).div_euclid(2);
    let written = Region::new(x, y, clip.width() as i32, clip.height() as i32).clipped(buffer.width(), buffer.height());

    if clip.members.is_none() {
        buffer.paste(&clip.pixels, x, y);
        return written;
    }
    for dy in written.y..written.y + written.height {
        for dx in written.x..written.x + written.width {
            let (cx, cy) = ((dx - x) as usize, (dy - y) as usize);
            if clip.is_member(cx, cy) {
                buffer.set_pixel(dx as usize, dy as usize, clip.pixels.pixel(cx, cy));
            }
        }
    }
    written
}
