//! Palette, color quantization, fill patterns and raster operations

// ============================================================================
// Palette
// ============================================================================

/// Palette index (0..16) into the fixed 16-color palette
pub type ColorIndex = u8;

pub const COLOR_BLACK: ColorIndex = 0;
pub const COLOR_DARK_GRAY: ColorIndex = 1;
pub const COLOR_GRAY: ColorIndex = 2;
pub const COLOR_LIGHT_GRAY: ColorIndex = 3;
pub const COLOR_LIGHT_BROWN: ColorIndex = 4;
pub const COLOR_BROWN: ColorIndex = 5;
pub const COLOR_DARK_GREEN: ColorIndex = 6;
pub const COLOR_GREEN: ColorIndex = 7;
pub const COLOR_LIGHT_BLUE: ColorIndex = 8;
pub const COLOR_BLUE: ColorIndex = 9;
pub const COLOR_PURPLE: ColorIndex = 10;
pub const COLOR_PINK: ColorIndex = 11;
pub const COLOR_RED: ColorIndex = 12;
pub const COLOR_ORANGE: ColorIndex = 13;
pub const COLOR_YELLOW: ColorIndex = 14;
pub const COLOR_WHITE: ColorIndex = 15;
pub const NUM_COLORS: usize = 16;

/// Transparency key; never stored in a framebuffer
pub const COLOR_TRANSPARENT: ColorIndex = 16;

/// The standard Macintosh 16-color palette followed by the transparency key
pub const PALETTE: [(u8, u8, u8); NUM_COLORS + 1] = [
    (0x00, 0x00, 0x00), // Black
    (0x20, 0x20, 0x20), // Dark Gray
    (0x80, 0x80, 0x80), // Gray
    (0xC0, 0xC0, 0xC0), // Light Gray
    (0x90, 0x71, 0x3A), // Light Brown
    (0x56, 0x2C, 0x05), // Brown
    (0x00, 0x64, 0x11), // Dark Green
    (0x1F, 0xB7, 0x14), // Green
    (0x02, 0xAB, 0xEA), // Light Blue
    (0x00, 0x00, 0xD4), // Blue
    (0x46, 0x00, 0xA5), // Purple
    (0xF2, 0x08, 0x84), // Pink
    (0xDD, 0x08, 0x06), // Red
    (0xFF, 0x64, 0x02), // Orange
    (0xFC, 0xF3, 0x05), // Yellow
    (0xFF, 0xFF, 0xFF), // White
    (0xFF, 0x00, 0xFF), // Transparent
];

/// RGB value of a palette entry. Indices past the palette wrap into the
/// 16 drawable colors.
#[inline]
pub fn palette_rgb(index: ColorIndex) -> (u8, u8, u8) {
    PALETTE[(index & 0x0F) as usize]
}

/// Nearest drawable palette entry to an RGB color (squared euclidean distance,
/// lowest index wins ties)
pub fn nearest_index(r: u8, g: u8, b: u8) -> ColorIndex {
    let mut best = COLOR_BLACK;
    let mut best_dist = u32::MAX;

    for (i, &(pr, pg, pb)) in PALETTE[..NUM_COLORS].iter().enumerate() {
        let dr = r as i32 - pr as i32;
        let dg = g as i32 - pg as i32;
        let db = b as i32 - pb as i32;
        let dist = (dr * dr + dg * dg + db * db) as u32;
        if dist < best_dist {
            best_dist = dist;
            best = i as ColorIndex;
        }
    }

    best
}

/// HSV to RGB color conversion
/// h: 0-360, s: 0-1, v: 0-1
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}

/// Palette index for a hue given on a 0-256 wheel (wrapping) with byte-scaled
/// saturation and value
pub fn hsv_index(h: f32, s: u8, v: u8) -> ColorIndex {
    let degrees = h.rem_euclid(256.0) * (360.0 / 256.0);
    let (r, g, b) = hsv_to_rgb(degrees, s as f32 / 255.0, v as f32 / 255.0);
    nearest_index(r, g, b)
}

// ============================================================================
// Patterns
// ============================================================================

/// An 8x8 1-bit tile, one byte per row, MSB is the leftmost pixel
pub type Pattern = [u8; 8];

pub const PATTERN_BLACK: Pattern = [0x00; 8];
pub const PATTERN_WHITE: Pattern = [0xFF; 8];
pub const PATTERN_GRAY: Pattern = [0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55];
pub const PATTERN_LIGHT_GRAY: Pattern = [0x88, 0x22, 0x88, 0x22, 0x88, 0x22, 0x88, 0x22];
pub const PATTERN_DARK_GRAY: Pattern = [0x77, 0xDD, 0x77, 0xDD, 0x77, 0xDD, 0x77, 0xDD];

// ============================================================================
// Raster Operations
// ============================================================================

/// Boolean rule combining source bits with the current pattern row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterOp {
    /// src
    #[default]
    None,
    /// !src
    SrcInvert,
    /// src & pat
    PatternAnd,
    /// src & !pat
    PatternAndNot,
    /// src | pat
    PatternOr,
    /// src ^ pat
    PatternXor,
    /// !src ^ pat
    SrcInvertPatternXor,
    /// !src | pat
    SrcInvertPatternOr,
    /// !src & pat
    SrcInvertPatternAnd,
}

impl RasterOp {
    /// Combine one byte of source bits with one byte of pattern bits
    #[inline]
    pub fn apply(self, src: u8, pat: u8) -> u8 {
        match self {
            RasterOp::None => src,
            RasterOp::SrcInvert => !src,
            RasterOp::PatternAnd => src & pat,
            RasterOp::PatternAndNot => src & !pat,
            RasterOp::PatternOr => src | pat,
            RasterOp::PatternXor => src ^ pat,
            RasterOp::SrcInvertPatternXor => !src ^ pat,
            RasterOp::SrcInvertPatternOr => !src | pat,
            RasterOp::SrcInvertPatternAnd => !src & pat,
        }
    }
}

/// Write mode register state
///
/// `Masked` only touches pixels that both the primitive covers and the bit
/// mask register allows. `Replace` writes every covered pixel, ignoring the
/// bit mask, and is what full-screen fills use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    Replace,
    #[default]
    Masked,
}

/// Split a color index into its four bitplane bytes (all bits set or clear)
#[inline]
pub(crate) fn plane_fill(color: ColorIndex) -> [u8; 4] {
    let mut planes = [0u8; 4];
    for (p, plane) in planes.iter_mut().enumerate() {
        if color & (1 << p) != 0 {
            *plane = 0xFF;
        }
    }
    planes
}
