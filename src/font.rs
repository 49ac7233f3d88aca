//! Proportional bitmap fonts
//!
//! A font is a single 1bpp strip holding every glyph side by side, plus a
//! table indexed by character code. Ink is stored as 0 bits, so glyphs are
//! drawn with `RasterOp::SrcInvert`.

use crate::color::RasterOp;
use crate::graphics::Graphics;
use crate::rect::Rect;

/// Placement of one character in the glyph strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Pixels to move right before drawing
    pub offset: u8,
    /// Total advance, including spacing on the right
    pub width: u8,
    /// First column of the glyph in the strip; the glyph ends where the
    /// next table entry begins
    pub location: u16,
}

impl Glyph {
    /// Marker value for characters the font cannot draw
    pub const UNPRINTABLE: u8 = 255;

    pub fn unprintable(location: u16) -> Self {
        Self {
            offset: Self::UNPRINTABLE,
            width: Self::UNPRINTABLE,
            location,
        }
    }

    #[inline]
    pub fn is_printable(&self) -> bool {
        self.offset != Self::UNPRINTABLE && self.width != Self::UNPRINTABLE
    }
}

pub struct Font {
    name: String,
    glyphs: Vec<Glyph>,
    image: Vec<u8>,
    /// Strip width in pixels (the bitmap span)
    width: i32,
    height: i32,
    max_height: i32,
    leading: i32,
}

impl Font {
    /// Build a font from its glyph table and strip bitmap
    ///
    /// `image` must hold `height` rows of `ceil(width / 8)` bytes.
    pub fn new(
        name: &str,
        glyphs: Vec<Glyph>,
        image: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("font {}: empty glyph strip", name));
        }
        let needed = width.div_ceil(8) as usize * height as usize;
        if image.len() < needed {
            return Err(format!(
                "font {}: strip needs {} bytes, got {}",
                name,
                needed,
                image.len()
            ));
        }
        if let Some((code, g)) = glyphs
            .iter()
            .enumerate()
            .find(|(_, g)| g.is_printable() && i32::from(g.location) >= width as i32)
        {
            return Err(format!(
                "font {}: glyph {} starts at {} past the strip",
                name, code, g.location
            ));
        }

        Ok(Self {
            name: name.to_string(),
            glyphs,
            image,
            width: width as i32,
            height: height as i32,
            max_height: height as i32,
            leading: 0,
        })
    }

    /// Override the line metrics (defaults: strip height, no leading)
    pub fn with_metrics(mut self, max_height: i32, leading: i32) -> Self {
        self.max_height = max_height;
        self.leading = leading;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distance between baselines of consecutive lines
    pub fn line_height(&self) -> i32 {
        self.max_height + self.leading
    }

    fn glyph(&self, c: u8) -> Option<&Glyph> {
        self.glyphs.get(c as usize).filter(|g| g.is_printable())
    }

    /// Columns of the strip covered by glyph `c`, inclusive
    fn glyph_columns(&self, c: u8, glyph: &Glyph) -> (i32, i32) {
        let end = self
            .glyphs
            .get(c as usize + 1)
            .map_or(self.width, |next| i32::from(next.location))
            .min(self.width);
        (i32::from(glyph.location), end - 1)
    }

    /// Size of `s` rendered in this font, without leading
    pub fn measure_string(&self, s: &str) -> (i32, i32) {
        let width = s
            .bytes()
            .filter_map(|c| self.glyph(c))
            .map(|g| i32::from(g.width))
            .sum();
        (width, self.max_height)
    }

    /// Draw `s` with its top-left corner at (x, y) in the pen color
    ///
    /// Characters without a glyph are skipped. Returns the x position just
    /// past the last glyph.
    pub fn draw_string(&self, g: &mut Graphics, s: &str, x: i32, y: i32) -> i32 {
        let mut pen_x = x;
        for c in s.bytes() {
            let Some(glyph) = self.glyph(c) else {
                continue;
            };
            let (left, right) = self.glyph_columns(c, glyph);
            if right >= left {
                let src = Rect::from_bounds(left, 0, right, self.height - 1);
                let dst = Rect::new(
                    pen_x + i32::from(glyph.offset),
                    y,
                    src.width(),
                    self.height,
                );
                g.blit_op(&self.image, RasterOp::SrcInvert, &dst, &src, self.width);
            }
            pen_x += i32::from(glyph.width);
        }
        pen_x
    }

    /// Tiny 3x5 font with digits, a few capitals and basic punctuation
    pub fn tiny() -> Self {
        const CELL: usize = 3;
        const ROWS: usize = 5;
        const CHARS: &[(u8, [u8; ROWS])] = &[
            (b'0', [0b111, 0b101, 0b101, 0b101, 0b111]),
            (b'1', [0b010, 0b110, 0b010, 0b010, 0b111]),
            (b'2', [0b111, 0b001, 0b111, 0b100, 0b111]),
            (b'3', [0b111, 0b001, 0b111, 0b001, 0b111]),
            (b'4', [0b101, 0b101, 0b111, 0b001, 0b001]),
            (b'5', [0b111, 0b100, 0b111, 0b001, 0b111]),
            (b'6', [0b111, 0b100, 0b111, 0b101, 0b111]),
            (b'7', [0b111, 0b001, 0b001, 0b001, 0b001]),
            (b'8', [0b111, 0b101, 0b111, 0b101, 0b111]),
            (b'9', [0b111, 0b101, 0b111, 0b001, 0b111]),
            (b':', [0b000, 0b010, 0b000, 0b010, 0b000]),
            (b'.', [0b000, 0b000, 0b000, 0b000, 0b010]),
            (b'-', [0b000, 0b000, 0b111, 0b000, 0b000]),
            (b'A', [0b010, 0b101, 0b111, 0b101, 0b101]),
            (b'C', [0b111, 0b100, 0b100, 0b100, 0b111]),
            (b'D', [0b110, 0b101, 0b101, 0b101, 0b110]),
            (b'E', [0b111, 0b100, 0b110, 0b100, 0b111]),
            (b'F', [0b111, 0b100, 0b110, 0b100, 0b100]),
            (b'I', [0b111, 0b010, 0b010, 0b010, 0b111]),
            (b'L', [0b100, 0b100, 0b100, 0b100, 0b111]),
            (b'N', [0b110, 0b101, 0b101, 0b101, 0b101]),
            (b'O', [0b111, 0b101, 0b101, 0b101, 0b111]),
            (b'P', [0b110, 0b101, 0b110, 0b100, 0b100]),
            (b'R', [0b110, 0b101, 0b110, 0b101, 0b101]),
            (b'S', [0b111, 0b100, 0b111, 0b001, 0b111]),
            (b'T', [0b111, 0b010, 0b010, 0b010, 0b010]),
            (b'U', [0b101, 0b101, 0b101, 0b101, 0b111]),
        ];

        let width = CHARS.len() * CELL;
        let span_bytes = width.div_ceil(8);
        // Paper everywhere, then punch the ink in as 0 bits
        let mut image = vec![0xFF; span_bytes * ROWS];
        let mut glyphs = Vec::with_capacity(256);
        let mut location = 0usize;

        for code in 0..=255u8 {
            if code == b' ' {
                glyphs.push(Glyph {
                    offset: 0,
                    width: (CELL + 1) as u8,
                    location: location as u16,
                });
                continue;
            }
            let Some((_, rows)) = CHARS.iter().find(|(c, _)| *c == code) else {
                glyphs.push(Glyph::unprintable(location as u16));
                continue;
            };
            for (y, bits) in rows.iter().enumerate() {
                for i in 0..CELL {
                    if bits & (1 << (CELL - 1 - i)) != 0 {
                        let x = location + i;
                        image[y * span_bytes + x / 8] &= !(0x80 >> (x % 8));
                    }
                }
            }
            glyphs.push(Glyph {
                offset: 0,
                width: (CELL + 1) as u8,
                location: location as u16,
            });
            location += CELL;
        }

        Self {
            name: "tiny".to_string(),
            glyphs,
            image,
            width: width as i32,
            height: ROWS as i32,
            max_height: ROWS as i32,
            leading: 1,
        }
    }
}
