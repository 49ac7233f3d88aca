//! Primitive rectangles and clipping
//!
//! All bounds are inclusive: a rectangle at (x, y) with size (w, h) covers
//! columns `x..=x+w-1` and rows `y..=y+h-1`.

/// Result of clipping a rectangle against a clip region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipStatus {
    /// Already fully inside the clip region
    NoChange,
    /// At least one bound was clamped
    Clipped,
    /// Entirely outside the clip region
    Rejected,
}

impl ClipStatus {
    #[inline]
    pub fn is_rejected(self) -> bool {
        self == ClipStatus::Rejected
    }
}

/// Inclusive integer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Build from position and size
    ///
    /// Bounds saturate at the edges of `i32`.
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x.saturating_add(w.saturating_sub(1)),
            bottom: y.saturating_add(h.saturating_sub(1)),
        }
    }

    /// Build directly from the four inclusive bounds
    #[inline]
    pub const fn from_bounds(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Smallest rectangle containing both endpoints of a line segment
    pub fn from_line(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            left: x0.min(x1),
            top: y0.min(y1),
            right: x0.max(x1),
            bottom: y0.max(y1),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left).saturating_add(1)
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top).saturating_add(1)
    }

    /// Back to (x, y, w, h)
    #[inline]
    pub fn to_xywh(&self) -> (i32, i32, i32, i32) {
        (self.left, self.top, self.width(), self.height())
    }

    /// True when the rectangle covers no pixels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// True when `other` lies completely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.top += dy;
        self.right += dx;
        self.bottom += dy;
    }

    /// Copy of this rectangle moved by (dx, dy)
    pub fn translated(mut self, dx: i32, dy: i32) -> Self {
        self.translate(dx, dy);
        self
    }

    /// Union treats single-row and single-column rectangles as empty, so
    /// they never widen a bounding box.
    #[inline]
    fn is_empty_for_union(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    /// Bounding rectangle of `self` and `other`
    ///
    /// If either input is empty the other one is returned unmodified.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty_for_union() {
            return *other;
        }
        if other.is_empty_for_union() {
            return *self;
        }

        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Overlapping area of two rectangles, or `None` if they are disjoint
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        if self.bottom < other.top
            || self.right < other.left
            || self.top > other.bottom
            || self.left > other.right
        {
            return None;
        }

        Some(Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        })
    }

    /// Clamp this rectangle in place to `clip`
    ///
    /// Each bound is clamped independently so callers can tell exactly
    /// which edges moved. A rejected rectangle is left untouched.
    pub fn clip(&mut self, clip: &Rect) -> ClipStatus {
        if self.bottom < clip.top {
            return ClipStatus::Rejected;
        }
        if self.right < clip.left {
            return ClipStatus::Rejected;
        }
        if self.top > clip.bottom {
            return ClipStatus::Rejected;
        }
        if self.left > clip.right {
            return ClipStatus::Rejected;
        }

        let mut status = ClipStatus::NoChange;
        if self.top < clip.top {
            self.top = clip.top;
            status = ClipStatus::Clipped;
        }
        if self.left < clip.left {
            self.left = clip.left;
            status = ClipStatus::Clipped;
        }
        if self.right > clip.right {
            self.right = clip.right;
            status = ClipStatus::Clipped;
        }
        if self.bottom > clip.bottom {
            self.bottom = clip.bottom;
            status = ClipStatus::Clipped;
        }

        status
    }
}

/// Clip `dst` against `clip` and move `src` in lock-step
///
/// Whatever was trimmed from an edge of `dst` is trimmed from the same edge
/// of `src`, so a clipped destination still samples the matching part of the
/// source bitmap. On rejection neither rectangle is modified.
pub fn clip_rect_adjust(dst: &mut Rect, src: &mut Rect, clip: &Rect) -> ClipStatus {
    let orig = *dst;
    let status = dst.clip(clip);
    if status.is_rejected() {
        return status;
    }

    src.left += dst.left - orig.left;
    src.top += dst.top - orig.top;
    src.right -= orig.right - dst.right;
    src.bottom -= orig.bottom - dst.bottom;

    status
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIP: Rect = Rect::from_bounds(20, 20, 30, 30);

    fn clipped(rect: Rect) -> (ClipStatus, Rect) {
        let mut r = rect;
        let status = r.clip(&CLIP);
        (status, r)
    }

    #[test]
    fn test_new_inclusive_bounds() {
        let r = Rect::new(10, 20, 5, 3);
        assert_eq!(r, Rect::from_bounds(10, 20, 14, 22));
        assert_eq!(r.width(), 5);
        assert_eq!(r.height(), 3);
        assert_eq!(r.to_xywh(), (10, 20, 5, 3));
    }

    #[test]
    fn test_from_line_orders_endpoints() {
        let r = Rect::from_line(30, 5, 10, 25);
        assert_eq!(r, Rect::from_bounds(10, 5, 30, 25));
    }

    #[test]
    fn test_translate() {
        let r = Rect::new(0, 0, 4, 4).translated(3, -2);
        assert_eq!(r, Rect::from_bounds(3, -2, 6, 1));
    }

    #[test]
    fn test_clip_corner() {
        let (status, r) = clipped(Rect::from_bounds(15, 15, 25, 25));
        assert_eq!(status, ClipStatus::Clipped);
        assert_eq!(r, Rect::from_bounds(20, 20, 25, 25));
    }

    #[test]
    fn test_clip_each_side() {
        let cases = [
            (Rect::from_bounds(20, 15, 30, 25), Rect::from_bounds(20, 20, 30, 25)),
            (Rect::from_bounds(25, 15, 35, 25), Rect::from_bounds(25, 20, 30, 25)),
            (Rect::from_bounds(25, 20, 35, 30), Rect::from_bounds(25, 20, 30, 30)),
            (Rect::from_bounds(25, 25, 35, 35), Rect::from_bounds(25, 25, 30, 30)),
            (Rect::from_bounds(20, 25, 30, 80), Rect::from_bounds(20, 25, 30, 30)),
            (Rect::from_bounds(15, 25, 25, 35), Rect::from_bounds(20, 25, 25, 30)),
            (Rect::from_bounds(15, 20, 25, 30), Rect::from_bounds(20, 20, 25, 30)),
        ];
        for (input, expected) in cases {
            let (status, r) = clipped(input);
            assert_eq!(status, ClipStatus::Clipped, "input {:?}", input);
            assert_eq!(r, expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_clip_full_reject() {
        let original = Rect::from_bounds(15, 15, 19, 19);
        let (status, r) = clipped(original);
        assert_eq!(status, ClipStatus::Rejected);
        assert_eq!(r, original);
    }

    #[test]
    fn test_clip_rejects_all_directions() {
        let rejected = [
            Rect::from_bounds(20, 15, 30, 19),
            Rect::from_bounds(30 + 1, 20, 35, 30),
            Rect::from_bounds(20, 31, 30, 35),
            Rect::from_bounds(15, 20, 19, 29),
            Rect::from_bounds(30, 15, 35, 19),
            Rect::from_bounds(31, 30, 35, 35),
            Rect::from_bounds(15, 30, 19, 35),
            Rect::from_bounds(15, 15, 19, 19),
        ];
        for r in rejected {
            assert_eq!(clipped(r).0, ClipStatus::Rejected, "rect {:?}", r);
        }
    }

    #[test]
    fn test_clip_boundary_sweep() {
        // One pixel outside each edge rejects, touching the edge does not
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let x = if dx < 0 {
                CLIP.left - 1
            } else if dx > 0 {
                CLIP.right + 1
            } else {
                25
            };
            let y = if dy < 0 {
                CLIP.top - 1
            } else if dy > 0 {
                CLIP.bottom + 1
            } else {
                25
            };
            assert_eq!(clipped(Rect::new(x, y, 1, 1)).0, ClipStatus::Rejected);
            let (status, _) = clipped(Rect::new(x - dx, y - dy, 1, 1));
            assert_eq!(status, ClipStatus::NoChange);
        }
    }

    #[test]
    fn test_clip_no_change_is_idempotent() {
        let inside = Rect::from_bounds(20, 20, 29, 29);
        let (status, r) = clipped(inside);
        assert_eq!(status, ClipStatus::NoChange);
        assert_eq!(r, inside);
    }

    #[test]
    fn test_clip_result_inside_clip() {
        for left in (0..50).step_by(7) {
            for top in (0..50).step_by(5) {
                for w in [1, 3, 11, 40] {
                    let mut r = Rect::new(left, top, w, w / 2 + 1);
                    if r.clip(&CLIP) != ClipStatus::Rejected {
                        assert!(CLIP.contains_rect(&r), "{:?} escaped clip", r);
                    }
                }
            }
        }
    }

    #[test]
    fn test_clip_single_row_and_column() {
        let (status, r) = clipped(Rect::from_bounds(10, 25, 40, 25));
        assert_eq!(status, ClipStatus::Clipped);
        assert_eq!(r, Rect::from_bounds(20, 25, 30, 25));

        let (status, r) = clipped(Rect::from_bounds(22, 0, 22, 100));
        assert_eq!(status, ClipStatus::Clipped);
        assert_eq!(r, Rect::from_bounds(22, 20, 22, 30));
    }

    #[test]
    fn test_clip_adjust_moves_source() {
        let mut dst = Rect::from_bounds(25, 25, 35, 35);
        let mut src = Rect::from_bounds(0, 0, 10, 10);
        let status = clip_rect_adjust(&mut dst, &mut src, &CLIP);
        assert_eq!(status, ClipStatus::Clipped);
        assert_eq!(dst, Rect::from_bounds(25, 25, 30, 30));
        assert_eq!(src, Rect::from_bounds(0, 0, 5, 5));
    }

    #[test]
    fn test_clip_adjust_near_edges() {
        let mut dst = Rect::from_bounds(16, 18, 24, 26);
        let mut src = Rect::from_bounds(100, 200, 108, 208);
        clip_rect_adjust(&mut dst, &mut src, &CLIP);
        assert_eq!(dst, Rect::from_bounds(20, 20, 24, 26));
        assert_eq!(src, Rect::from_bounds(104, 202, 108, 208));
        assert_eq!(dst.width(), src.width());
        assert_eq!(dst.height(), src.height());
    }

    #[test]
    fn test_clip_adjust_reject_leaves_source() {
        let mut dst = Rect::from_bounds(0, 0, 5, 5);
        let mut src = Rect::from_bounds(0, 0, 5, 5);
        let status = clip_rect_adjust(&mut dst, &mut src, &CLIP);
        assert_eq!(status, ClipStatus::Rejected);
        assert_eq!(src, Rect::from_bounds(0, 0, 5, 5));
    }

    #[test]
    fn test_union_overlap() {
        let a = Rect::from_bounds(0, 0, 10, 10);
        let b = Rect::from_bounds(5, 5, 15, 15);
        assert_eq!(a.union(&b), Rect::from_bounds(0, 0, 15, 15));
    }

    #[test]
    fn test_union_disjoint() {
        let a = Rect::from_bounds(0, 0, 4, 4);
        let b = Rect::from_bounds(40, 50, 60, 70);
        assert_eq!(a.union(&b), Rect::from_bounds(0, 0, 60, 70));
        assert_eq!(b.union(&a), Rect::from_bounds(0, 0, 60, 70));
    }

    #[test]
    fn test_union_empty_is_identity() {
        let x = Rect::from_bounds(10, 20, 30, 40);
        let empty = Rect::default();
        assert_eq!(empty.union(&x), x);
        assert_eq!(x.union(&empty), x);
    }

    #[test]
    fn test_intersect() {
        let a = Rect::from_bounds(0, 0, 10, 10);
        let b = Rect::from_bounds(5, 3, 15, 8);
        assert_eq!(a.intersect(&b), Some(Rect::from_bounds(5, 3, 10, 8)));
        assert_eq!(a.intersect(&Rect::from_bounds(11, 0, 20, 10)), None);
        assert_eq!(a.intersect(&Rect::from_bounds(0, -5, 10, -1)), None);
    }

    #[test]
    fn test_intersect_touching_edge() {
        let a = Rect::from_bounds(0, 0, 10, 10);
        let b = Rect::from_bounds(10, 10, 20, 20);
        assert_eq!(a.intersect(&b), Some(Rect::from_bounds(10, 10, 10, 10)));
    }

    #[test]
    fn test_new_saturates_at_i32_edges() {
        let r = Rect::new(i32::MAX - 1, i32::MIN, 5, 3);
        assert_eq!(r.right, i32::MAX);
        assert_eq!(r.bottom, i32::MIN + 2);
        assert_eq!(Rect::new(i32::MIN, 0, i32::MIN, 1).right, i32::MIN);

        let wide = Rect::from_bounds(i32::MIN, 0, i32::MAX, 0);
        assert_eq!(wide.width(), i32::MAX);
        assert_eq!(wide.height(), 1);
    }
}
