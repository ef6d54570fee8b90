use crate::shared::constants::{MIN_CONTRACTED_SIZE, SELECTION_STEP};
use crate::shared::mask::Mask;
use crate::shared::region::{Point, Region};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("seed ({x}, {y}) is outside the {width}x{height} image")]
    SeedOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

/// Result of a magic-wand fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WandSelection {
    /// Tight bounding box of the selected pixels.
    pub region: Region,
    /// Exact membership; `region` may include unselected pixels.
    pub mask: Mask,
    pub pixel_count: usize,
}

/// The active selection of an editing session.
///
/// Rectangle tools produce a bare region. The magic wand also carries a
/// per-pixel mask; resizing a wand selection drops the mask and keeps the
/// resized rectangle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    region: Option<Region>,
    mask: Option<Mask>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all(canvas_w: u32, canvas_h: u32) -> Self {
        Self {
            region: Some(Region::full(canvas_w, canvas_h)),
            mask: None,
        }
    }

    /// Rectangle spanned by two drag points. A zero-area drag selects
    /// nothing.
    pub fn rectangle(a: Point, b: Point, canvas_w: u32, canvas_h: u32) -> Self {
        let region = Region::from_corners(a, b, canvas_w, canvas_h);
        if region.is_empty() {
            return Self::none();
        }
        Self {
            region: Some(region),
            mask: None,
        }
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.region.is_some()
    }

    /// Whether `(x, y)` is selected: inside the region and, for wand
    /// selections, set in the mask.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let Some(region) = self.region else {
            return false;
        };
        if !region.contains(Point::new(x, y)) {
            return false;
        }
        match &self.mask {
            Some(mask) => {
                x >= 0
                    && y >= 0
                    && (x as u32) < mask.width()
                    && (y as u32) < mask.height()
                    && mask.get(x as usize, y as usize)
            }
            None => true,
        }
    }

    pub fn clear(&mut self) {
        self.region = None;
        self.mask = None;
    }

    pub fn select_all(&mut self, canvas_w: u32, canvas_h: u32) {
        *self = Self::all(canvas_w, canvas_h);
    }

    /// Toggles between nothing and everything: a selection whose rectangle
    /// covers the frame inverts to none, anything else (including none) to
    /// the full frame.
    pub fn invert(&mut self, canvas_w: u32, canvas_h: u32) {
        let is_full = self
            .region
            .is_some_and(|r| r.is_full_frame(canvas_w, canvas_h));
        if is_full {
            self.clear();
        } else {
            self.select_all(canvas_w, canvas_h);
        }
    }

    /// Grows the rectangle by [`SELECTION_STEP`] on every side, clamped to
    /// the canvas. No-op without a selection.
    pub fn expand(&mut self, canvas_w: u32, canvas_h: u32) {
        if let Some(region) = self.region {
            self.region = Some(region.expanded(SELECTION_STEP, canvas_w, canvas_h));
            self.mask = None;
        }
    }

    /// Shrinks the rectangle by [`SELECTION_STEP`] on every side, keeping at
    /// least [`MIN_CONTRACTED_SIZE`] in each dimension and staying on the
    /// canvas. A rectangle pushed entirely off the canvas clears the
    /// selection. No-op without a selection.
    pub fn contract(&mut self, canvas_w: u32, canvas_h: u32) {
        if let Some(region) = self.region {
            let contracted = region.contracted(SELECTION_STEP, MIN_CONTRACTED_SIZE, canvas_w, canvas_h);
            if contracted.is_empty() {
                self.clear();
            } else {
                self.region = Some(contracted);
                self.mask = None;
            }
        }
    }
}

impl From<WandSelection> for Selection {
    fn from(wand: WandSelection) -> Self {
        Self {
            region: Some(wand.region),
            mask: Some(wand.mask),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn test_none_is_inactive() {
        let selection = Selection::none();
        assert!(!selection.is_active());
        assert!(!selection.contains(0, 0));
    }

    #[test]
    fn test_rectangle_from_any_drag_direction() {
        let a = Selection::rectangle(Point::new(30, 40), Point::new(10, 5), 100, 100);
        assert_eq!(a.region(), Some(Region::new(10, 5, 20, 35)));
    }

    #[test]
    fn test_rectangle_is_clipped_to_canvas() {
        let s = Selection::rectangle(Point::new(-10, -10), Point::new(500, 20), 100, 50);
        assert_eq!(s.region(), Some(Region::new(0, 0, 100, 20)));
    }

    #[test]
    fn test_zero_area_drag_selects_nothing() {
        let s = Selection::rectangle(Point::new(5, 5), Point::new(5, 40), 100, 100);
        assert!(!s.is_active());
    }

    // ── Invert ───────────────────────────────────────────────────────

    #[test]
    fn test_invert_full_frame_clears() {
        let mut s = Selection::all(64, 48);
        s.invert(64, 48);
        assert!(!s.is_active());
    }

    #[test]
    fn test_invert_partial_selects_all() {
        let mut s = Selection::rectangle(Point::new(1, 1), Point::new(10, 10), 64, 48);
        s.invert(64, 48);
        assert_eq!(s.region(), Some(Region::full(64, 48)));
    }

    #[test]
    fn test_invert_none_selects_all() {
        let mut s = Selection::none();
        s.invert(8, 8);
        assert_eq!(s, Selection::all(8, 8));
    }

    // ── Expand / contract ────────────────────────────────────────────

    #[test]
    fn test_expand_clamps_to_canvas() {
        let mut s = Selection::rectangle(Point::new(5, 50), Point::new(50, 90), 100, 100);
        s.expand(100, 100);
        assert_eq!(s.region(), Some(Region::new(0, 40, 65, 60)));
    }

    #[test]
    fn test_contract_keeps_minimum_size() {
        let mut s = Selection::rectangle(Point::new(0, 0), Point::new(100, 30), 200, 200);
        s.contract(200, 200);
        assert_eq!(s.region(), Some(Region::new(10, 10, 80, 20)));
    }

    #[test]
    fn test_contract_small_selection_stays_on_canvas() {
        let mut s = Selection::rectangle(Point::new(0, 0), Point::new(10, 10), 12, 12);
        s.contract(12, 12);
        let region = s.region().unwrap();
        assert_eq!(region, Region::new(10, 10, 2, 2));
        assert!(region.fits_within(12, 12));
    }

    #[test]
    fn test_contract_off_canvas_clears_selection() {
        let mut s = Selection::all(8, 8);
        s.contract(8, 8);
        assert!(!s.is_active());
    }

    #[test]
    fn test_expand_without_selection_is_noop() {
        let mut s = Selection::none();
        s.expand(10, 10);
        s.contract(10, 10);
        assert!(!s.is_active());
    }

    // ── Wand selections ──────────────────────────────────────────────

    fn diagonal_wand() -> WandSelection {
        let mut mask = Mask::new(4, 4);
        mask.set(1, 1, true);
        mask.set(2, 2, true);
        WandSelection {
            region: Region::new(1, 1, 2, 2),
            mask,
            pixel_count: 2,
        }
    }

    #[test]
    fn test_wand_selection_respects_mask() {
        let s = Selection::from(diagonal_wand());
        assert!(s.contains(1, 1));
        assert!(!s.contains(2, 1));
        assert!(!s.contains(0, 0));
    }

    #[test]
    fn test_resizing_wand_selection_drops_mask() {
        let mut s = Selection::from(diagonal_wand());
        s.expand(4, 4);
        assert!(s.mask().is_none());
        assert!(s.contains(2, 1));
    }

    #[test]
    fn test_invert_full_frame_wand_clears() {
        let mut s = Selection::from(WandSelection {
            region: Region::full(2, 2),
            mask: Mask::full(2, 2),
            pixel_count: 4,
        });
        s.invert(2, 2);
        assert!(!s.is_active());
    }
}
