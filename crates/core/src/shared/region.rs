use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
///
/// Signed so that callers can express positions off the canvas; operations
/// check bounds against the buffer before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in buffer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole canvas.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Normalized box spanned by two drag points, clipped to the canvas.
    pub fn from_corners(a: Point, b: Point, canvas_w: u32, canvas_h: u32) -> Self {
        let x0 = a.x.min(b.x).clamp(0, canvas_w as i32);
        let y0 = a.y.min(b.y).clamp(0, canvas_h as i32);
        let x1 = a.x.max(b.x).clamp(0, canvas_w as i32);
        let y1 = a.y.max(b.y).clamp(0, canvas_h as i32);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }

    /// True when the box lies inside a `canvas_w x canvas_h` buffer.
    pub fn fits_within(&self, canvas_w: u32, canvas_h: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 0
            && self.height >= 0
            && self.x + self.width <= canvas_w as i32
            && self.y + self.height <= canvas_h as i32
    }

    pub fn is_full_frame(&self, canvas_w: u32, canvas_h: u32) -> bool {
        *self == Self::full(canvas_w, canvas_h)
    }

    /// Grows the box by `by` pixels on every side, clamped to the canvas.
    pub fn expanded(&self, by: i32, canvas_w: u32, canvas_h: u32) -> Self {
        let x = (self.x - by).max(0);
        let y = (self.y - by).max(0);
        let width = (self.width + by * 2).min(canvas_w as i32 - x);
        let height = (self.height + by * 2).min(canvas_h as i32 - y);
        Self::new(x, y, width, height)
    }

    /// Shrinks the box by `by` pixels on every side, never below `min_size`
    /// in either dimension, then clips the result to the canvas. A small box
    /// near the far edge can clip to nothing.
    pub fn contracted(&self, by: i32, min_size: i32, canvas_w: u32, canvas_h: u32) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            (self.width - by * 2).max(min_size),
            (self.height - by * 2).max(min_size),
        )
        .clipped(canvas_w, canvas_h)
    }

    /// Intersection with the canvas rectangle.
    pub fn clipped(&self, canvas_w: u32, canvas_h: u32) -> Self {
        let x0 = self.x.clamp(0, canvas_w as i32);
        let y0 = self.y.clamp(0, canvas_h as i32);
        let x1 = (self.x + self.width).clamp(0, canvas_w as i32);
        let y1 = (self.y + self.height).clamp(0, canvas_h as i32);
        Self::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // ── Geometry ─────────────────────────────────────────────────────

    #[test]
    fn test_full_covers_canvas() {
        let r = Region::full(640, 480);
        assert_eq!(r, Region::new(0, 0, 640, 480));
        assert!(r.is_full_frame(640, 480));
        assert!(!r.is_full_frame(640, 481));
    }

    #[test]
    fn test_from_corners_normalizes_drag_direction() {
        let r = Region::from_corners(Point::new(50, 40), Point::new(10, 20), 100, 100);
        assert_eq!(r, Region::new(10, 20, 40, 20));
    }

    #[test]
    fn test_from_corners_clips_to_canvas() {
        let r = Region::from_corners(Point::new(-10, -10), Point::new(150, 30), 100, 100);
        assert_eq!(r, Region::new(0, 0, 100, 30));
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Region::new(2, 2, 3, 3);
        assert!(r.contains(Point::new(2, 2)));
        assert!(r.contains(Point::new(4, 4)));
        assert!(!r.contains(Point::new(5, 4)));
        assert!(!r.contains(Point::new(1, 3)));
    }

    #[rstest]
    #[case::inside(Region::new(0, 0, 10, 10), true)]
    #[case::touching_far_edge(Region::new(5, 5, 5, 5), true)]
    #[case::overflow_x(Region::new(6, 0, 5, 5), false)]
    #[case::negative_origin(Region::new(-1, 0, 5, 5), false)]
    fn test_fits_within(#[case] r: Region, #[case] expected: bool) {
        assert_eq!(r.fits_within(10, 10), expected);
    }

    #[test]
    fn test_expanded_clamps_to_canvas() {
        let r = Region::new(5, 5, 20, 20).expanded(10, 30, 30);
        assert_eq!(r, Region::new(0, 0, 30, 30));
    }

    #[test]
    fn test_expanded_in_middle() {
        let r = Region::new(20, 20, 10, 10).expanded(10, 100, 100);
        assert_eq!(r, Region::new(10, 10, 30, 30));
    }

    #[test]
    fn test_contracted_respects_minimum() {
        let r = Region::new(0, 0, 30, 100).contracted(10, 20, 100, 100);
        assert_eq!(r, Region::new(10, 10, 20, 80));
    }

    #[test]
    fn test_contracted_stays_inside_canvas() {
        let r = Region::new(0, 0, 10, 10).contracted(10, 20, 12, 12);
        assert_eq!(r, Region::new(10, 10, 2, 2));
        assert!(r.fits_within(12, 12));
    }

    #[test]
    fn test_contracted_past_far_edge_is_empty() {
        let r = Region::full(8, 8).contracted(10, 20, 8, 8);
        assert!(r.is_empty());
        assert!(r.fits_within(8, 8));
    }

    #[test]
    fn test_clipped() {
        let r = Region::new(-5, 8, 20, 20).clipped(10, 10);
        assert_eq!(r, Region::new(0, 8, 10, 2));
    }

    #[test]
    fn test_area_and_empty() {
        assert_eq!(Region::new(0, 0, 4, 5).area(), 20);
        assert!(Region::new(0, 0, 0, 5).is_empty());
        assert!(!Region::new(0, 0, 1, 1).is_empty());
    }
}
