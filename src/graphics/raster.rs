//! Lines, rectangles and circles
//!
//! Every primitive reduces to byte-column writes: a vertical line sets one
//! bit per row, a horizontal run sets a partial first byte, whole middle
//! bytes and a partial last byte.
//!
//! Geometry is worked out in `i64` and clipped before it is narrowed back
//! to framebuffer coordinates, so any `i32` input is safe to draw.

use super::{select_planes, Graphics};
use crate::color::{plane_fill, Pattern, RasterOp, WriteMode};
use crate::rect::Rect;
use crate::surface::NUM_PLANES;

/// Midpoint circle walk over the second octant, from (0, r) until x meets y
///
/// `d` starts at `1 - r`; the east step adds `delta_e` (3, then +2 per
/// step) and the north-east step adds `delta_ne` (`-2r + 5`, then +4).
struct Octant {
    x: i64,
    y: i64,
    d: i64,
    delta_e: i64,
    delta_ne: i64,
    done: bool,
}

fn octant_points(radius: i64) -> Octant {
    Octant {
        x: 0,
        y: radius,
        d: 1 - radius,
        delta_e: 3,
        delta_ne: 5 - 2 * radius,
        done: false,
    }
}

impl Iterator for Octant {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let point = (self.x, self.y);
        if self.y > self.x {
            if self.d < 0 {
                self.d += self.delta_e;
                self.delta_e += 2;
                self.delta_ne += 2;
            } else {
                self.d += self.delta_ne;
                self.delta_e += 2;
                self.delta_ne += 4;
                self.y -= 1;
            }
            self.x += 1;
        } else {
            self.done = true;
        }
        Some(point)
    }
}

/// Largest corner radius a `width` x `height` rounded rectangle can carry
#[inline]
fn clamp_radius(radius: i64, width: i64, height: i64) -> i64 {
    let max = ((width.min(height) - 2) / 2).max(0);
    radius.clamp(0, max)
}

/// Integer division rounding toward positive infinity, for `d > 0`
#[inline]
fn ceil_div(n: i128, d: i128) -> i128 {
    -((-n).div_euclid(d))
}

/// True when all of `clip` sits more than two pixels inside the circle
///
/// Outline points stay within half a pixel of the true radius, so no
/// outline pixel can land in such a clip and a fill covers all of it.
fn clip_inside_circle(clip: &Rect, x0: i64, y0: i64, radius: i64) -> bool {
    if radius < 2 || clip.is_empty() {
        return false;
    }
    let reach = i128::from(radius - 2).pow(2);
    [
        (clip.left, clip.top),
        (clip.right, clip.top),
        (clip.left, clip.bottom),
        (clip.right, clip.bottom),
    ]
    .iter()
    .all(|&(x, y)| {
        let dx = i128::from(i64::from(x) - x0);
        let dy = i128::from(i64::from(y) - y0);
        dx * dx + dy * dy < reach
    })
}

impl Graphics {
    /// Fill the whole framebuffer with the pen color
    ///
    /// Switches to replace mode, which stays in effect until the next
    /// `set_color`.
    pub fn fill_screen(&mut self) {
        self.pen.write_mode = WriteMode::Replace;
        self.surface.fill(self.pen.color);
    }

    /// One clipped row from `left` to `right` inclusive
    fn span(&mut self, left: i32, right: i32, y: i32, planes: [u8; NUM_PLANES]) {
        let first = left >> 3;
        let last = right >> 3;
        let left_mask = 0xFFu8 >> (left & 7);
        let right_mask = 0xFFu8 << (7 - (right & 7));

        if first == last {
            self.write_planes(first, y, left_mask & right_mask, planes);
            return;
        }
        self.write_planes(first, y, left_mask, planes);
        for bx in first + 1..last {
            self.write_planes(bx, y, 0xFF, planes);
        }
        self.write_planes(last, y, right_mask, planes);
    }

    /// Whether the inclusive box overlaps the clip region at all
    fn touches_clip(&self, left: i64, top: i64, right: i64, bottom: i64) -> bool {
        let c = self.clip;
        left <= right
            && top <= bottom
            && right >= i64::from(c.left)
            && left <= i64::from(c.right)
            && bottom >= i64::from(c.top)
            && top <= i64::from(c.bottom)
    }

    /// Fill an inclusive box in the pen color, clipped
    fn fill_wide(&mut self, left: i64, top: i64, right: i64, bottom: i64) {
        let c = self.clip;
        let l = left.max(i64::from(c.left));
        let t = top.max(i64::from(c.top));
        let r = right.min(i64::from(c.right));
        let b = bottom.min(i64::from(c.bottom));
        if l > r || t > b {
            return;
        }

        // Inside the clip now, so back in i32 range
        let planes = plane_fill(self.pen.color);
        for y in t as i32..=b as i32 {
            self.span(l as i32, r as i32, y, planes);
        }
    }

    /// Single pixel at a possibly far-away point
    #[inline]
    fn plot(&mut self, x: i64, y: i64) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.draw_pixel(x, y);
        }
    }

    pub fn draw_vert_line(&mut self, x: i32, y: i32, len: i32) {
        if len <= 0 {
            return;
        }
        let (x, y) = (i64::from(x), i64::from(y));
        self.fill_wide(x, y, x, y + i64::from(len) - 1);
    }

    pub fn draw_horiz_line(&mut self, x: i32, y: i32, len: i32) {
        if len <= 0 {
            return;
        }
        let (x, y) = (i64::from(x), i64::from(y));
        self.fill_wide(x, y, x + i64::from(len) - 1, y);
    }

    /// Exact 45 degree line of `len` pixels going down from (x1, y1)
    ///
    /// The line heads right when `x2 > x1` and left otherwise. Only the
    /// starting column and the direction matter; `x2` is not an endpoint.
    pub fn draw_diag_line(&mut self, x1: i32, y1: i32, x2: i32, len: i32) {
        if len <= 0 {
            return;
        }
        let step = if x1 < x2 { 1 } else { -1 };
        self.diag(i64::from(x1), i64::from(y1), step, i64::from(len));
    }

    /// Walk a single-bit mask down the visible part of a diagonal
    fn diag(&mut self, x1: i64, y1: i64, step: i64, len: i64) {
        let c = self.clip;
        let (cl, ct, cr, cb) = (
            i64::from(c.left),
            i64::from(c.top),
            i64::from(c.right),
            i64::from(c.bottom),
        );

        // Rows where the line is between the clip's columns
        let (enter, leave) = if step > 0 {
            (cl - x1, cr - x1)
        } else {
            (x1 - cr, x1 - cl)
        };
        let first = y1.max(ct).max(y1 + enter);
        let last = (y1 + len - 1).min(cb).min(y1 + leave);
        if first > last {
            return;
        }

        let x = x1 + step * (first - y1);
        let mut byte_x = x.div_euclid(8) as i32;
        let mut bit = 0x80u8 >> x.rem_euclid(8);
        for y in first as i32..=last as i32 {
            self.write_pen(byte_x, y, bit);

            // Rotate the mask one pixel, carrying into the next byte column
            if step > 0 {
                bit >>= 1;
                if bit == 0 {
                    bit = 0x80;
                    byte_x += 1;
                }
            } else {
                bit <<= 1;
                if bit == 0 {
                    bit = 0x01;
                    byte_x -= 1;
                }
            }
        }
    }

    /// Arbitrary line using run-length slices
    ///
    /// Lines are always drawn top to bottom, so swapping the endpoints
    /// yields the same pixels. Runs lying before the clip region are
    /// stepped over in one go and drawing stops once the line leaves it.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (x1, y1, x2, y2) = if y1 > y2 {
            (x2, y2, x1, y1)
        } else {
            (x1, y1, x2, y2)
        };
        if self.clipped(&Rect::from_line(x1, y1, x2, y2)).is_none() {
            return;
        }
        let (mut x1, mut y1, x2, y2) = (
            i64::from(x1),
            i64::from(y1),
            i64::from(x2),
            i64::from(y2),
        );

        let y_delta = y2 - y1;
        let mut x_delta = x2 - x1;
        if x_delta == 0 {
            self.fill_wide(x1, y1, x1, y2);
            return;
        }
        let x_advance = if x_delta < 0 {
            x_delta = -x_delta;
            -1
        } else {
            1
        };

        if y_delta == 0 {
            self.fill_wide(x1.min(x2), y1, x1.max(x2), y1);
            return;
        }
        if y_delta == x_delta {
            self.diag(x1, y1, x_advance, x_delta + 1);
            return;
        }

        let (major, minor) = if x_delta > y_delta {
            (x_delta, y_delta)
        } else {
            (y_delta, x_delta)
        };

        let min_run_len = major / minor;
        let adj_up = (major % minor) * 2;
        let adj_down = minor * 2;

        // Half a step along the minor axis before the first run
        let mut error = (major % minor) - adj_down;

        // The first and last runs share one full run plus the initial pixel
        let mut run_len = min_run_len / 2 + 1;
        let final_run_len = run_len;
        if min_run_len & 1 != 0 {
            error += minor;
        } else if adj_up == 0 {
            // No fractional advance: the spare pixel goes to the last run
            run_len -= 1;
        }

        let x_major = x_delta > y_delta;
        let run = |g: &mut Self, x: &mut i64, y: &mut i64, len: i64| {
            if x_major {
                let left = if x_advance < 0 { *x - len + 1 } else { *x };
                g.fill_wide(left, *y, left + len - 1, *y);
                *x += x_advance * len;
                *y += 1;
            } else {
                g.fill_wide(*x, *y, *x, *y + len - 1);
                *y += len;
                *x += x_advance;
            }
        };

        let c = self.clip;
        let (cl, ct, cr, cb) = (
            i64::from(c.left),
            i64::from(c.top),
            i64::from(c.right),
            i64::from(c.bottom),
        );
        let past_clip = |x: i64, y: i64| {
            y > cb || (x_advance > 0 && x > cr) || (x_advance < 0 && x < cl)
        };

        run(self, &mut x1, &mut y1, run_len);

        // Each middle run moves one step along the minor axis; those short
        // of the clip only advance the cursor and the error term. After k
        // runs the error has gained k * adj_up and lost adj_down once per
        // long run.
        let before = if x_major {
            ct - y1
        } else if x_advance > 0 {
            cl - x1
        } else {
            x1 - cr
        };
        let skip = before.clamp(0, minor - 1);
        if skip > 0 {
            let total = i128::from(error) + i128::from(skip) * i128::from(adj_up);
            let long_runs = ceil_div(total, i128::from(adj_down)).max(0);
            error = (total - long_runs * i128::from(adj_down)) as i64;
            let advance = skip * min_run_len + long_runs as i64;
            if x_major {
                x1 += x_advance * advance;
                y1 += skip;
            } else {
                y1 += advance;
                x1 += x_advance * skip;
            }
        }

        for _ in skip..minor - 1 {
            if past_clip(x1, y1) {
                return;
            }
            let mut len = min_run_len;
            error += adj_up;
            if error > 0 {
                len += 1;
                error -= adj_down;
            }
            run(self, &mut x1, &mut y1, len);
        }
        run(self, &mut x1, &mut y1, final_run_len);
    }

    /// One-pixel outline of `rect`
    pub fn draw_rect(&mut self, rect: &Rect) {
        let (l, t, r, b) = (
            i64::from(rect.left),
            i64::from(rect.top),
            i64::from(rect.right),
            i64::from(rect.bottom),
        );
        self.fill_wide(l, t, l, b);
        self.fill_wide(l + 1, t, r, t);
        self.fill_wide(r, t + 1, r, b);
        self.fill_wide(l + 1, b, r - 1, b);
    }

    pub fn fill_rect(&mut self, rect: &Rect) {
        let Some((r, _)) = self.clipped(rect) else {
            return;
        };
        let planes = plane_fill(self.pen.color);
        for y in r.top..=r.bottom {
            self.span(r.left, r.right, y, planes);
        }
    }

    /// Fill `rect` with an all-ones source combined with `pattern` by `op`
    ///
    /// The pattern is anchored to the framebuffer, not to the rectangle.
    /// Result bits of 1 take the pen color, 0 bits the background color.
    pub fn fill_rect_op(&mut self, pattern: &Pattern, op: RasterOp, rect: &Rect) {
        let Some((r, _)) = self.clipped(rect) else {
            return;
        };
        for y in r.top..=r.bottom {
            let bits = op.apply(0xFF, pattern[(y & 7) as usize]);
            let planes = select_planes(bits, self.pen.color, self.pen.bg_color);
            self.span(r.left, r.right, y, planes);
        }
    }

    pub fn draw_circle(&mut self, x0: i32, y0: i32, radius: i32) {
        if radius < 0 {
            return;
        }
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(radius));
        if !self.touches_clip(x0 - r, y0 - r, x0 + r, y0 + r)
            || clip_inside_circle(&self.clip, x0, y0, r)
        {
            return;
        }
        for (x, y) in octant_points(r) {
            self.plot(x0 + x, y0 + y);
            self.plot(x0 + y, y0 + x);
            self.plot(x0 + y, y0 - x);
            self.plot(x0 + x, y0 - y);
            self.plot(x0 - x, y0 - y);
            self.plot(x0 - y, y0 - x);
            self.plot(x0 - y, y0 + x);
            self.plot(x0 - x, y0 + y);
        }
    }

    /// Solid disc; spans near the poles overlap and are redrawn
    pub fn fill_circle(&mut self, x0: i32, y0: i32, radius: i32) {
        if radius < 0 {
            return;
        }
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(radius));
        if !self.touches_clip(x0 - r, y0 - r, x0 + r, y0 + r) {
            return;
        }
        if clip_inside_circle(&self.clip, x0, y0, r) {
            let clip = self.clip;
            self.fill_rect(&clip);
            return;
        }
        for (x, y) in octant_points(r) {
            self.fill_wide(x0 - x, y0 - y, x0 + x, y0 - y);
            self.fill_wide(x0 - y, y0 - x, x0 + y, y0 - x);
            self.fill_wide(x0 - y, y0 + x, x0 + y, y0 + x);
            self.fill_wide(x0 - x, y0 + y, x0 + x, y0 + y);
        }
    }

    /// Outline of a rectangle with quarter-circle corners
    ///
    /// The radius is clamped so opposite corners never cross.
    pub fn draw_round_rect(&mut self, x0: i32, y0: i32, radius: i32, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        let (x0, y0, w, h) = (
            i64::from(x0),
            i64::from(y0),
            i64::from(width),
            i64::from(height),
        );
        let (x1, y1) = (x0 + w - 1, y0 + h - 1);
        if !self.touches_clip(x0, y0, x1, y1) {
            return;
        }
        let r = clamp_radius(i64::from(radius), w, h);

        // Straight edges without the corners
        self.fill_wide(x0, y0 + r + 1, x0, y1 - r - 1);
        self.fill_wide(x0 + r + 1, y0, x1 - r - 1, y0);
        self.fill_wide(x1, y0 + r + 1, x1, y1 - r - 1);
        self.fill_wide(x0 + r + 1, y1, x1 - r - 1, y1);

        // Corner centers
        let left = x0 + r;
        let top = y0 + r;
        let right = x1 - r;
        let bottom = y1 - r;

        for (x, y) in octant_points(r) {
            self.plot(right + x, bottom + y);
            self.plot(right + y, bottom + x);
            self.plot(right + y, top - x);
            self.plot(right + x, top - y);
            self.plot(left - x, top - y);
            self.plot(left - y, top - x);
            self.plot(left - y, bottom + x);
            self.plot(left - x, bottom + y);
        }
    }

    pub fn fill_round_rect(&mut self, x0: i32, y0: i32, radius: i32, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        let (x0, y0, w, h) = (
            i64::from(x0),
            i64::from(y0),
            i64::from(width),
            i64::from(height),
        );
        let (x1, y1) = (x0 + w - 1, y0 + h - 1);
        if !self.touches_clip(x0, y0, x1, y1) {
            return;
        }
        let r = clamp_radius(i64::from(radius), w, h);

        self.fill_wide(x0, y0 + r + 1, x1, y1 - r - 1);

        // Corner rows run from the left arc across to the mirrored right arc
        let left = x0 + r;
        let right = x1 - r;
        let top = y0 + r;
        let bottom = y1 - r;

        for (x, y) in octant_points(r) {
            self.fill_wide(left - x, top - y, right + x, top - y);
            self.fill_wide(left - y, top - x, right + y, top - x);
            self.fill_wide(left - y, bottom + x, right + y, bottom + x);
            self.fill_wide(left - x, bottom + y, right + x, bottom + y);
        }
    }
}
