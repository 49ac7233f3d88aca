//! Bitmap compositing
//!
//! Bitmaps are 1bpp, MSB first, `ceil(span / 8)` bytes per row. A source
//! column rarely lines up with a destination byte column, so each output
//! byte is assembled from two neighbouring source bytes: the high byte
//! shifted left by the sub-byte offset, the low byte shifted right to fill
//! the gap.

use super::{select_planes, Graphics};
use crate::color::{plane_fill, RasterOp};
use crate::rect::{clip_rect_adjust, Rect};
use crate::surface::NUM_PLANES;

/// Eight source bits starting at pixel `start` of `row`, each source byte
/// passed through `op` with pattern byte `pat` before shifting
#[inline]
fn fetch(row: &[u8], start: i32, op: RasterOp, pat: u8) -> u8 {
    let byte = |i: i32| -> u8 {
        usize::try_from(i)
            .ok()
            .and_then(|i| row.get(i))
            .map_or(0, |&b| op.apply(b, pat))
    };

    let index = start.div_euclid(8);
    let shift = start.rem_euclid(8);
    let hi = byte(index);
    if shift == 0 {
        return hi;
    }
    let lo = byte(index + 1);
    (hi << shift) | (lo >> (8 - shift))
}

/// Visit every destination byte column of a clipped blit
///
/// `f` gets the byte column, destination row, source row, source pixel
/// lined up with the byte column's first bit, and the mask of bits inside
/// `dst`.
fn for_each_byte(dst: Rect, src: Rect, mut f: impl FnMut(i32, i32, usize, i32, u8)) {
    let first = dst.left >> 3;
    let last = dst.right >> 3;
    let left_mask = 0xFFu8 >> (dst.left & 7);
    let right_mask = 0xFFu8 << (7 - (dst.right & 7));

    for row in 0..dst.height() {
        let y = dst.top + row;
        let src_y = (src.top + row) as usize;
        for byte_x in first..=last {
            let mut cover = 0xFF;
            if byte_x == first {
                cover &= left_mask;
            }
            if byte_x == last {
                cover &= right_mask;
            }
            let start = src.left + (byte_x * 8 - dst.left);
            f(byte_x, y, src_y, start, cover);
        }
    }
}

/// Destination and source for drawing a whole bitmap at `dst`
///
/// The source starts at the bitmap origin and is cut to the `span` x rows
/// the bitmap holds; `dst` shrinks with it. None when nothing is left.
fn bitmap_rects(dst: &Rect, span: i32, len: usize) -> Option<(Rect, Rect)> {
    assert!(span > 0, "bitmap span must be positive, got {}", span);
    let span_bytes = (span as usize).div_ceil(8);
    let rows = i32::try_from(len / span_bytes).unwrap_or(i32::MAX);

    let src = Rect::new(0, 0, dst.width(), dst.height()).intersect(&Rect::new(0, 0, span, rows))?;
    if src.is_empty() {
        return None;
    }
    Some((Rect::new(dst.left, dst.top, src.width(), src.height()), src))
}

impl Graphics {
    /// Clip a blit and validate it against its bitmap
    ///
    /// Returns the clipped destination and source and the row stride in
    /// bytes, or None when nothing is visible.
    fn clip_blit(
        &self,
        dst: &Rect,
        src: &Rect,
        span: i32,
        len: usize,
    ) -> Option<(Rect, Rect, usize)> {
        assert!(
            dst.width() == src.width() && dst.height() == src.height(),
            "blit size mismatch: dst {}x{}, src {}x{}",
            dst.width(),
            dst.height(),
            src.width(),
            src.height()
        );
        assert!(span > 0, "blit span must be positive, got {}", span);

        let span_bytes = ((span + 7) / 8) as usize;
        let mut d = *dst;
        let mut s = *src;
        if clip_rect_adjust(&mut d, &mut s, &self.clip).is_rejected() || d.is_empty() {
            return None;
        }

        assert!(
            s.left >= 0
                && s.top >= 0
                && s.right < span
                && (s.bottom as usize + 1) * span_bytes <= len,
            "blit source {:?} outside a {}-pixel-wide bitmap of {} bytes",
            s,
            span,
            len
        );
        Some((d, s, span_bytes))
    }

    /// Stencil `src` of `img` onto `dst` in the pen color
    pub fn blit(&mut self, img: &[u8], dst: &Rect, src: &Rect, span: i32) {
        self.blit_op(img, RasterOp::None, dst, src, span);
    }

    /// Stencil blit through a raster op
    ///
    /// Each source byte is combined with one row of the current pattern.
    /// Pattern row 0 lines up with the first row of `src` as given, before
    /// clipping, so a blit clipped at the top keeps its phase. Result bits
    /// of 1 take the pen color; 0 bits leave the destination alone.
    pub fn blit_op(&mut self, img: &[u8], op: RasterOp, dst: &Rect, src: &Rect, span: i32) {
        let Some((d, s, span_bytes)) = self.clip_blit(dst, src, span, img.len()) else {
            return;
        };
        let pattern = self.pen.pattern;
        let planes = plane_fill(self.pen.color);
        let phase = src.top;

        for_each_byte(d, s, |byte_x, y, src_y, start, cover| {
            let row = &img[src_y * span_bytes..(src_y + 1) * span_bytes];
            let pat = pattern[(src_y as i32 - phase).rem_euclid(8) as usize];
            let bits = fetch(row, start, op, pat);
            self.write_planes(byte_x, y, cover & bits, planes);
        });
    }

    /// Two-color blit through a mask
    ///
    /// Where the mask bit is 0 the destination is untouched. Elsewhere an
    /// image bit of 1 draws the pen color and 0 the background color.
    pub fn blit_with_mask(&mut self, img: &[u8], mask: &[u8], dst: &Rect, src: &Rect, span: i32) {
        assert_eq!(img.len(), mask.len(), "image and mask bitmaps differ in size");
        let Some((d, s, span_bytes)) = self.clip_blit(dst, src, span, img.len()) else {
            return;
        };
        let (fg, bg) = (self.pen.color, self.pen.bg_color);

        for_each_byte(d, s, |byte_x, y, src_y, start, cover| {
            let rows = src_y * span_bytes..(src_y + 1) * span_bytes;
            let bits = fetch(&img[rows.clone()], start, RasterOp::None, 0);
            let visible = fetch(&mask[rows], start, RasterOp::None, 0);
            self.write_planes(byte_x, y, cover & visible, select_planes(bits, fg, bg));
        });
    }

    /// Masked blit of a whole bitmap to `dst`
    ///
    /// The bitmap is `span` pixels wide and as tall as `mask` holds rows. A
    /// `dst` larger than that is trimmed at its right and bottom edges.
    pub fn draw_bitmap(&mut self, dst: &Rect, span: i32, img: &[u8], mask: &[u8]) {
        let Some((dst, src)) = bitmap_rects(dst, span, mask.len()) else {
            return;
        };
        self.blit_with_mask(img, mask, &dst, &src, span);
    }

    /// Masked blit of a four-plane color bitmap
    ///
    /// `planes` holds the four bitplanes back to back, each as many rows of
    /// `ceil(span / 8)` bytes as `mask`; plane `p` supplies bit `p` of the
    /// color index. `dst` is trimmed to the bitmap like in `draw_bitmap`.
    pub fn draw_color_bitmap(&mut self, dst: &Rect, span: i32, planes: &[u8], mask: &[u8]) {
        let Some((dst, src)) = bitmap_rects(dst, span, mask.len()) else {
            return;
        };
        let Some((d, s, span_bytes)) = self.clip_blit(&dst, &src, span, mask.len()) else {
            return;
        };
        let plane_len = (mask.len() / span_bytes) * span_bytes;
        assert!(
            planes.len() >= NUM_PLANES * plane_len,
            "color bitmap needs {} bytes of planes, got {}",
            NUM_PLANES * plane_len,
            planes.len()
        );

        for_each_byte(d, s, |byte_x, y, src_y, start, cover| {
            let offset = src_y * span_bytes;
            let colors: [u8; NUM_PLANES] = std::array::from_fn(|p| {
                let base = p * plane_len + offset;
                fetch(&planes[base..base + span_bytes], start, RasterOp::None, 0)
            });
            let visible = fetch(&mask[offset..offset + span_bytes], start, RasterOp::None, 0);
            self.write_planes(byte_x, y, cover & visible, colors);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::color::{
        ColorIndex, Pattern, COLOR_BLUE, COLOR_GREEN, COLOR_RED, COLOR_WHITE, PATTERN_GRAY,
    };

    /// Deterministic junk bitmap
    fn bitmap(span_bytes: usize, rows: usize, seed: usize) -> Vec<u8> {
        (0..span_bytes * rows)
            .map(|i| ((i * 37 + seed * 11 + 5) % 251) as u8)
            .collect()
    }

    fn bit(img: &[u8], span_bytes: usize, x: i32, y: i32) -> bool {
        img[y as usize * span_bytes + (x as usize >> 3)] & (0x80 >> (x & 7)) != 0
    }

    /// Source pixel that lands on (x, y), if (x, y) is inside `dst`
    fn source_of(dst: &Rect, src: &Rect, x: i32, y: i32) -> Option<(i32, i32)> {
        dst.contains(x, y)
            .then_some((x - dst.left + src.left, y - dst.top + src.top))
    }

    fn check_stencil(g: &Graphics, img: &[u8], span_bytes: usize, dst: &Rect, src: &Rect) {
        let visible = g.clip();
        for y in 0..g.height() {
            for x in 0..g.width() {
                let expected = match source_of(dst, src, x, y) {
                    Some((sx, sy)) if visible.contains(x, y) && bit(img, span_bytes, sx, sy) => {
                        COLOR_RED
                    },
                    _ => COLOR_WHITE,
                };
                assert_eq!(g.pixel(x, y), Some(expected), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_fetch_shifts_across_bytes() {
        let row = [0b1010_0001, 0b1100_0000];
        assert_eq!(fetch(&row, 0, RasterOp::None, 0), 0b1010_0001);
        assert_eq!(fetch(&row, 3, RasterOp::None, 0), 0b0000_1110);
        assert_eq!(fetch(&row, 8, RasterOp::None, 0), 0b1100_0000);
        assert_eq!(fetch(&row, -2, RasterOp::None, 0), 0b0010_1000);
        assert_eq!(fetch(&row, 12, RasterOp::None, 0), 0);
        assert_eq!(fetch(&row, 3, RasterOp::SrcInvert, 0), 0b1111_0001);
    }

    #[test]
    fn test_blit_readback_misaligned() {
        let img = bitmap(3, 3, 1);
        let src = Rect::new(3, 0, 15, 3);
        let dst = Rect::new(5, 2, 15, 3);
        for mut g in both(32, 8) {
            g.set_color(COLOR_RED);
            g.blit(&img, &dst, &src, 20);
            check_stencil(&g, &img, 3, &dst, &src);
        }
    }

    #[test]
    fn test_blit_aligned_full_bytes() {
        let img = bitmap(2, 4, 2);
        let src = Rect::new(0, 0, 16, 4);
        let dst = Rect::new(8, 1, 16, 4);
        for mut g in both(32, 8) {
            g.set_color(COLOR_RED);
            g.blit(&img, &dst, &src, 16);
            check_stencil(&g, &img, 2, &dst, &src);
        }
    }

    #[test]
    fn test_blit_clipped_by_framebuffer() {
        let img = bitmap(3, 4, 3);
        let src = Rect::new(3, 0, 15, 4);
        let dst = Rect::new(-3, -1, 15, 4);
        for mut g in both(16, 8) {
            g.set_color(COLOR_RED);
            g.blit(&img, &dst, &src, 20);
            check_stencil(&g, &img, 3, &dst, &src);
        }
    }

    #[test]
    fn test_blit_clipped_by_region() {
        let img = bitmap(3, 6, 4);
        let src = Rect::new(1, 0, 20, 6);
        let dst = Rect::new(2, 1, 20, 6);
        for mut g in both(32, 8) {
            g.set_color(COLOR_RED);
            g.set_clip(&Rect::new(7, 3, 9, 2));
            g.blit(&img, &dst, &src, 21);
            check_stencil(&g, &img, 3, &dst, &src);
        }
    }

    #[test]
    fn test_blit_fully_clipped_is_noop() {
        let img = bitmap(1, 2, 5);
        for mut g in both(16, 16) {
            g.set_color(COLOR_RED);
            let before = snapshot(&g);
            g.blit(&img, &Rect::new(20, 3, 8, 2), &Rect::new(0, 0, 8, 2), 8);
            g.blit(&img, &Rect::new(-8, 3, 8, 2), &Rect::new(0, 0, 8, 2), 8);
            assert_eq!(snapshot(&g), before);
        }
    }

    #[test]
    #[should_panic(expected = "blit size mismatch")]
    fn test_blit_size_mismatch_panics() {
        let mut g = Graphics::init(&crate::config::GraphicsConfig::new(16, 16)).unwrap();
        let img = [0xFFu8; 4];
        g.blit(&img, &Rect::new(0, 0, 8, 2), &Rect::new(0, 0, 7, 2), 8);
    }

    #[test]
    fn test_blit_op_src_invert() {
        let img = bitmap(2, 3, 6);
        let src = Rect::new(2, 0, 11, 3);
        let dst = Rect::new(9, 0, 11, 3);
        let inverted: Vec<u8> = img.iter().map(|b| !b).collect();
        for mut g in both(24, 4) {
            g.set_color(COLOR_RED);
            g.blit_op(&img, RasterOp::SrcInvert, &dst, &src, 16);
            check_stencil(&g, &inverted, 2, &dst, &src);
        }
    }

    #[test]
    fn test_blit_op_pattern_rows() {
        let img = bitmap(2, 10, 7);
        let src = Rect::new(3, 0, 12, 10);
        let dst = Rect::new(1, 2, 12, 10);
        for mut g in both(16, 16) {
            g.set_color(COLOR_RED);
            g.set_pattern(&PATTERN_GRAY);
            g.blit_op(&img, RasterOp::PatternXor, &dst, &src, 16);
            for y in 0..16 {
                for x in 0..16 {
                    let expected = match source_of(&dst, &src, x, y) {
                        Some((sx, sy)) => {
                            let row = (sy - src.top) as usize % 8;
                            let pat = PATTERN_GRAY[row] & (0x80 >> (sx & 7)) != 0;
                            if bit(&img, 2, sx, sy) != pat {
                                COLOR_RED
                            } else {
                                COLOR_WHITE
                            }
                        },
                        None => COLOR_WHITE,
                    };
                    assert_eq!(g.pixel(x, y), Some(expected), "({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_all_zero_mask_leaves_destination() {
        let img = bitmap(2, 5, 8);
        let mask = vec![0u8; img.len()];
        for mut g in both(24, 8) {
            g.set_color(COLOR_RED);
            g.fill_rect(&Rect::new(0, 0, 6, 6));
            g.set_color(COLOR_BLUE);
            g.set_bg_color(COLOR_GREEN);
            let before = snapshot(&g);
            g.blit_with_mask(&img, &mask, &Rect::new(3, 1, 13, 5), &Rect::new(1, 0, 13, 5), 16);
            g.draw_bitmap(&Rect::new(5, 2, 16, 5), 16, &img, &mask);
            assert_eq!(snapshot(&g), before);
        }
    }

    #[test]
    fn test_masked_blit_two_colors() {
        let img = bitmap(2, 4, 9);
        let mask = bitmap(2, 4, 10);
        let src = Rect::new(0, 0, 10, 4);
        let dst = Rect::new(3, 1, 10, 4);
        for mut g in both(16, 8) {
            g.set_color(COLOR_GREEN);
            g.fill_screen();
            g.set_color(COLOR_RED);
            g.set_bg_color(COLOR_BLUE);
            g.draw_bitmap(&dst, 10, &img, &mask);
            for y in 0..8 {
                for x in 0..16 {
                    let expected = match source_of(&dst, &src, x, y) {
                        Some((sx, sy)) if bit(&mask, 2, sx, sy) => {
                            if bit(&img, 2, sx, sy) {
                                COLOR_RED
                            } else {
                                COLOR_BLUE
                            }
                        },
                        _ => COLOR_GREEN,
                    };
                    assert_eq!(g.pixel(x, y), Some(expected), "({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_draw_color_bitmap() {
        let (width, height) = (12usize, 2usize);
        let span_bytes = 2;
        let plane_len = span_bytes * height;
        let color_at = |x: usize, y: usize| ((x + 5 * y) % 16) as ColorIndex;

        let mut planes = vec![0u8; NUM_PLANES * plane_len];
        let mut mask = vec![0u8; plane_len];
        for y in 0..height {
            for x in 0..width {
                let bit = 0x80 >> (x % 8);
                for p in 0..NUM_PLANES {
                    if color_at(x, y) & (1 << p) != 0 {
                        planes[p * plane_len + y * span_bytes + x / 8] |= bit;
                    }
                }
                if !(x == 4 && y == 1) {
                    mask[y * span_bytes + x / 8] |= bit;
                }
            }
        }

        let dst = Rect::new(9, 3, width as i32, height as i32);
        for mut g in both(32, 8) {
            g.draw_color_bitmap(&dst, width as i32, &planes, &mask);
            for y in 0..8 {
                for x in 0..32 {
                    let expected = if dst.contains(x, y) && !(x == 13 && y == 4) {
                        color_at((x - 9) as usize, (y - 3) as usize)
                    } else {
                        COLOR_WHITE
                    };
                    assert_eq!(g.pixel(x, y), Some(expected), "({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_draw_color_bitmap_clipped() {
        // One row holding colors 0..8, half hanging off the left edge
        let planes = [0b0101_0101, 0b0011_0011, 0b0000_1111, 0b0000_0000];
        let mask = [0xFF];
        for mut g in both(8, 2) {
            g.draw_color_bitmap(&Rect::new(-4, 1, 8, 1), 8, &planes, &mask);
            let row: Vec<_> = (0..8).map(|x| g.pixel(x, 1).unwrap()).collect();
            assert_eq!(row, vec![4, 5, 6, 7, 15, 15, 15, 15]);
        }
    }

    #[test]
    fn test_blit_op_pattern_starts_at_source_top() {
        // Pattern row i sets only pixel i
        let stairs: Pattern = [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];
        let img = [0xFFu8; 12];
        for mut g in both(16, 4) {
            g.set_color(COLOR_RED);
            g.set_pattern(&stairs);
            let op = RasterOp::PatternAnd;
            g.blit_op(&img, op, &Rect::new(0, 0, 8, 1), &Rect::new(0, 3, 8, 1), 8);
            // Two rows cut off the top still advance the pattern
            g.blit_op(&img, op, &Rect::new(8, -2, 8, 4), &Rect::new(0, 3, 8, 4), 8);
            assert_eq!(pixels_of(&g, COLOR_RED), vec![(0, 0), (10, 0), (11, 1)]);
        }
    }

    #[test]
    fn test_draw_bitmap_trims_oversized_destination() {
        let img = bitmap(2, 16, 11);
        let mask = bitmap(2, 16, 12);
        for (mut oversized, mut exact) in both(32, 32).into_iter().zip(both(32, 32)) {
            for g in [&mut oversized, &mut exact] {
                g.set_color(COLOR_RED);
                g.set_bg_color(COLOR_BLUE);
            }
            oversized.draw_bitmap(&Rect::from_bounds(10, 10, 26, 26), 16, &img, &mask);
            exact.draw_bitmap(&Rect::new(10, 10, 16, 16), 16, &img, &mask);
            assert_eq!(snapshot(&oversized), snapshot(&exact));
            assert!(!pixels_of(&oversized, COLOR_RED).is_empty());
        }
    }

    #[test]
    fn test_draw_color_bitmap_trims_oversized_destination() {
        let planes = bitmap(1, 4 * 3, 13);
        let mask = [0xFF, 0xF0, 0x3C];
        for (mut oversized, mut exact) in both(16, 8).into_iter().zip(both(16, 8)) {
            oversized.draw_color_bitmap(&Rect::new(2, 1, 12, 6), 8, &planes, &mask);
            exact.draw_color_bitmap(&Rect::new(2, 1, 8, 3), 8, &planes, &mask);
            assert_eq!(snapshot(&oversized), snapshot(&exact));
            assert!(snapshot(&exact).iter().any(|&c| c != COLOR_WHITE));
        }
    }
}
