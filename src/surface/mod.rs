//! Framebuffer storage
//!
//! The raster and blit code works in terms of *byte columns*: a byte column
//! `bx` covers pixels `bx*8 ..= bx*8+7` of a row, with `0x80` being the
//! leftmost. Every write is a masked update of one byte column with one
//! byte per bitplane. That maps straight onto VGA planar memory and is
//! cheap to expand for a flat one-byte-per-pixel buffer.

mod indexed;
mod planar;

pub use indexed::IndexedSurface;
pub use planar::PlanarSurface;

use serde::{Deserialize, Serialize};

use crate::color::{palette_rgb, plane_fill, ColorIndex};
use crate::rect::Rect;

/// Number of bitplanes in a 16-color framebuffer
pub const NUM_PLANES: usize = 4;

/// Which framebuffer representation backs a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// One palette index per byte (SDL style)
    #[default]
    Indexed,
    /// Four packed 1-bit planes (VGA mode 12h style)
    Planar,
}

impl SurfaceKind {
    pub fn name(&self) -> &str {
        match self {
            SurfaceKind::Indexed => "indexed",
            SurfaceKind::Planar => "planar",
        }
    }
}

/// Mutable 16-color pixel storage
pub trait Surface: Send {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn kind(&self) -> SurfaceKind;

    /// Palette index at (x, y), or None if out of bounds
    fn pixel(&self, x: i32, y: i32) -> Option<ColorIndex>;

    /// Update one byte column of row `y`
    ///
    /// For every bit set in `mask` the pixel takes the color whose bit `p`
    /// is the matching bit of `planes[p]`. Bits outside the surface are
    /// ignored.
    fn write_byte(&mut self, byte_x: i32, y: i32, mask: u8, planes: [u8; NUM_PLANES]);

    /// Set every pixel to `color`
    fn fill(&mut self, color: ColorIndex);

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    /// Copy row `y` as palette indices into `out` (at most `width` entries)
    fn read_row(&self, y: i32, out: &mut [ColorIndex]) {
        for (x, slot) in out.iter_mut().enumerate().take(self.width() as usize) {
            *slot = self.pixel(x as i32, y).unwrap_or(0);
        }
    }

    /// Expand to RGBA8888 (ABGR byte order) through the palette
    fn to_rgba(&self, out: &mut [u8]) {
        let width = self.width() as usize;
        if width == 0 {
            return;
        }
        let mut row = vec![0; width];
        for (y, dest_row) in out.chunks_exact_mut(width * 4).enumerate() {
            self.read_row(y as i32, &mut row);
            for (dest, &index) in dest_row.chunks_exact_mut(4).zip(row.iter()) {
                let (r, g, b) = palette_rgb(index);
                dest.copy_from_slice(&[255, b, g, r]);
            }
        }
    }

    /// Set a single pixel (bounds checked)
    fn set_pixel(&mut self, x: i32, y: i32, color: ColorIndex) {
        if x < 0 {
            return;
        }
        self.write_byte(x >> 3, y, 0x80 >> (x & 7), plane_fill(color));
    }
}

/// Allocate an empty surface of the given kind
pub fn new_surface(kind: SurfaceKind, width: u32, height: u32) -> Box<dyn Surface> {
    match kind {
        SurfaceKind::Indexed => Box::new(IndexedSurface::with_size(width, height)),
        SurfaceKind::Planar => Box::new(PlanarSurface::with_size(width, height)),
    }
}

/// Expand a byte-column write into (bit, color) pairs for flat storage
#[inline]
pub(crate) fn expand_byte(mask: u8, planes: [u8; NUM_PLANES]) -> impl Iterator<Item = (i32, u8)> {
    (0..8).filter_map(move |i| {
        let bit = 0x80u8 >> i;
        if mask & bit == 0 {
            return None;
        }
        let mut color = 0u8;
        for (p, plane) in planes.iter().enumerate() {
            if plane & bit != 0 {
                color |= 1 << p;
            }
        }
        Some((i, color))
    })
}
