use guikit::color::{
    ColorIndex, Pattern, RasterOp, COLOR_BLACK, COLOR_BLUE, COLOR_DARK_GRAY, COLOR_RED,
    COLOR_WHITE, COLOR_YELLOW, PATTERN_BLACK, PATTERN_DARK_GRAY, PATTERN_GRAY,
    PATTERN_LIGHT_GRAY, PATTERN_WHITE,
};
use guikit::surface::NUM_PLANES;
use guikit::{Font, Graphics, Rect};

use super::Demo;

const SPRITE: i32 = 16;
const SPRITE_BYTES: usize = (SPRITE as usize) / 8;
const SWATCH: i32 = 48;
const GAP: i32 = 8;

const PATTERNS: [Pattern; 5] = [
    PATTERN_WHITE,
    PATTERN_LIGHT_GRAY,
    PATTERN_GRAY,
    PATTERN_DARK_GRAY,
    PATTERN_BLACK,
];

const OPS: [RasterOp; 9] = [
    RasterOp::None,
    RasterOp::SrcInvert,
    RasterOp::PatternAnd,
    RasterOp::PatternAndNot,
    RasterOp::PatternOr,
    RasterOp::PatternXor,
    RasterOp::SrcInvertPatternXor,
    RasterOp::SrcInvertPatternOr,
    RasterOp::SrcInvertPatternAnd,
];

/// Static showcase of patterns, raster ops and bitmaps
pub struct Patterns {
    font: Font,
    ring: Vec<u8>,
    disc: Vec<u8>,
    tiles: Vec<u8>,
    elapsed: f32,
}

fn set_bit(img: &mut [u8], x: usize, y: usize) {
    img[y * SPRITE_BYTES + x / 8] |= 0x80 >> (x % 8);
}

impl Patterns {
    pub fn new() -> Self {
        let size = SPRITE_BYTES * SPRITE as usize;
        let mut ring = vec![0u8; size];
        let mut disc = vec![0u8; size];
        let mut tiles = vec![0u8; size * NUM_PLANES];

        for y in 0..SPRITE as usize {
            for x in 0..SPRITE as usize {
                let (dx, dy) = (x as i32 * 2 - 15, y as i32 * 2 - 15);
                let d2 = dx * dx + dy * dy;
                if d2 <= 15 * 15 {
                    set_bit(&mut disc, x, y);
                    if d2 >= 9 * 9 {
                        set_bit(&mut ring, x, y);
                    }
                }
                // 4x4 blocks walking the whole palette
                let color = (y / 4 * 4 + x / 4) as ColorIndex;
                for (p, plane) in tiles.chunks_mut(size).enumerate() {
                    if color & (1 << p) != 0 {
                        set_bit(plane, x, y);
                    }
                }
            }
        }

        Self {
            font: Font::tiny(),
            ring,
            disc,
            tiles,
            elapsed: 0.0,
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Patterns {
    fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    fn render(&mut self, g: &mut Graphics) {
        g.set_color(COLOR_WHITE);
        g.fill_screen();

        g.set_color(COLOR_BLACK);
        self.font.draw_string(g, "PATTERNS", GAP, GAP);
        let mut y = GAP + self.font.line_height() + GAP;

        g.set_bg_color(COLOR_WHITE);
        for (i, pattern) in PATTERNS.iter().enumerate() {
            let x = GAP + i as i32 * (SWATCH + GAP);
            g.set_color(COLOR_BLUE);
            g.fill_rect_op(pattern, RasterOp::PatternAnd, &Rect::new(x, y, SWATCH, SWATCH));
            g.set_color(COLOR_BLACK);
            g.draw_rect(&Rect::new(x - 1, y - 1, SWATCH + 2, SWATCH + 2));
        }
        y += SWATCH + GAP * 2;

        g.set_color(COLOR_BLACK);
        self.font.draw_string(g, "OPS", GAP, y);
        y += self.font.line_height() + GAP;

        let src = Rect::new(0, 0, SPRITE, SPRITE);
        for (i, op) in OPS.iter().enumerate() {
            let x = GAP + i as i32 * (SPRITE * 2 + GAP);
            g.set_pattern(&PATTERN_GRAY);
            g.set_color(COLOR_RED);
            g.blit_op(&self.disc, *op, &Rect::new(x, y, SPRITE, SPRITE), &src, SPRITE);
            g.set_color(COLOR_BLACK);
            self.font.draw_string(g, &i.to_string(), x + SPRITE + 2, y);
        }
        g.set_pattern(&PATTERN_BLACK);
        y += SPRITE + GAP * 2;

        g.set_color(COLOR_BLACK);
        self.font.draw_string(g, "DATA", GAP, y);
        y += self.font.line_height() + GAP;

        // Masked sprites slide along a striped backdrop
        let band = Rect::new(GAP, y, g.width() - GAP * 2, SPRITE * 2);
        g.set_color(COLOR_DARK_GRAY);
        g.fill_rect_op(&PATTERN_LIGHT_GRAY, RasterOp::PatternAnd, &band);

        let travel = (band.width() - SPRITE).max(1);
        let offset = (self.elapsed * 60.0) as i32 % travel;
        g.set_color(COLOR_YELLOW);
        g.set_bg_color(COLOR_BLACK);
        let at = band.left + offset;
        g.draw_bitmap(&Rect::new(at, y, SPRITE, SPRITE), SPRITE, &self.ring, &self.disc);

        let at = band.right + 1 - SPRITE - offset;
        let dst = Rect::new(at, y + SPRITE, SPRITE, SPRITE);
        g.draw_color_bitmap(&dst, SPRITE, &self.tiles, &self.disc);
        g.set_bg_color(COLOR_WHITE);
    }

    fn name(&self) -> &str {
        "patterns"
    }
}
