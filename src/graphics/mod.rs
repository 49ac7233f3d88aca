//! The drawing context
//!
//! `Graphics` owns a framebuffer, the active clip rectangle and the pen
//! state. Raster primitives live in `raster`, bitmap compositing in `blit`.

mod blit;
mod raster;

use std::path::Path;

use crate::color::{
    hsv_index, nearest_index, plane_fill, ColorIndex, Pattern, WriteMode, COLOR_BLACK,
    COLOR_WHITE, PATTERN_BLACK,
};
use crate::config::GraphicsConfig;
use crate::rect::{ClipStatus, Rect};
use crate::screenshot;
use crate::surface::{new_surface, Surface, NUM_PLANES};

/// Drawing state shared by every primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenState {
    /// Foreground color
    pub color: ColorIndex,
    /// Color for 0 bits of masked blits and pattern fills
    pub bg_color: ColorIndex,
    /// Pattern used by `blit_op`
    pub pattern: Pattern,
    pub write_mode: WriteMode,
    /// Pixels whose bit is clear here are left alone in masked mode
    pub bit_mask: u8,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            color: COLOR_BLACK,
            bg_color: COLOR_WHITE,
            pattern: PATTERN_BLACK,
            write_mode: WriteMode::Masked,
            bit_mask: 0xFF,
        }
    }
}

pub struct Graphics {
    surface: Box<dyn Surface>,
    clip: Rect,
    pen: PenState,
}

impl Graphics {
    /// Allocate a framebuffer as described by `config` and clear it to white
    pub fn init(config: &GraphicsConfig) -> Result<Self, String> {
        config.validate()?;
        let surface = new_surface(config.backend, config.width, config.height);
        let graphics = Self::with_surface(surface);
        log::info!(
            "graphics initialized: {}x{} {}",
            config.width,
            config.height,
            config.backend.name()
        );
        Ok(graphics)
    }

    /// Wrap an existing surface. The surface is cleared to white.
    pub fn with_surface(mut surface: Box<dyn Surface>) -> Self {
        surface.fill(COLOR_WHITE);
        let clip = surface.bounds();
        Self {
            surface,
            clip,
            pen: PenState::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    // ========================================================================
    // Clipping
    // ========================================================================

    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Restrict drawing to `rect` (intersected with the framebuffer)
    ///
    /// A rectangle entirely off the framebuffer leaves an empty clip region,
    /// so everything is rejected until the clip is reset.
    pub fn set_clip(&mut self, rect: &Rect) {
        self.clip = rect
            .intersect(&self.surface.bounds())
            .unwrap_or(Rect::from_bounds(0, 0, -1, -1));
    }

    pub fn reset_clip(&mut self) {
        self.clip = self.surface.bounds();
    }

    // ========================================================================
    // Pen state
    // ========================================================================

    /// Set the pen color and return to masked writes
    pub fn set_color(&mut self, color: ColorIndex) {
        self.pen.color = color & 0x0F;
        self.pen.write_mode = WriteMode::Masked;
    }

    /// Set the pen to the palette entry nearest an RGB color
    pub fn set_color_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.set_color(nearest_index(r, g, b));
    }

    /// Set the pen from a hue on a 0-256 wheel plus byte saturation and value
    pub fn set_color_hsv(&mut self, h: f32, s: u8, v: u8) {
        self.set_color(hsv_index(h, s, v));
    }

    pub fn set_bg_color(&mut self, color: ColorIndex) {
        self.pen.bg_color = color & 0x0F;
    }

    pub fn set_bg_color_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.set_bg_color(nearest_index(r, g, b));
    }

    pub fn set_bg_color_hsv(&mut self, h: f32, s: u8, v: u8) {
        self.set_bg_color(hsv_index(h, s, v));
    }

    pub fn set_pattern(&mut self, pattern: &Pattern) {
        self.pen.pattern = *pattern;
    }

    pub fn set_write_mode(&mut self, mode: WriteMode) {
        self.pen.write_mode = mode;
    }

    /// Load the bit mask register (honored in masked mode only)
    pub fn set_bit_mask(&mut self, mask: u8) {
        self.pen.bit_mask = mask;
    }

    // ========================================================================
    // Pixels and output
    // ========================================================================

    /// Palette index at (x, y), or None off the framebuffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<ColorIndex> {
        self.surface.pixel(x, y)
    }

    /// Plot one pixel in the pen color, respecting the clip region
    pub fn draw_pixel(&mut self, x: i32, y: i32) {
        if self.clip.contains(x, y) {
            self.write_pen(x >> 3, y, 0x80 >> (x & 7));
        }
    }

    /// Convert the framebuffer to RGBA8888 for presentation
    pub fn to_rgba(&self, out: &mut [u8]) {
        self.surface.to_rgba(out);
    }

    /// Dump the framebuffer as an 8-bit indexed BMP
    pub fn save_screenshot(&self, path: impl AsRef<Path>) -> Result<(), String> {
        screenshot::save_bmp(self.surface.as_ref(), path)
    }

    // ========================================================================
    // Byte-column writes
    // ========================================================================

    /// Masked write of one byte column, gated by the write mode
    #[inline]
    fn write_planes(&mut self, byte_x: i32, y: i32, mask: u8, planes: [u8; NUM_PLANES]) {
        let mask = match self.pen.write_mode {
            WriteMode::Masked => mask & self.pen.bit_mask,
            WriteMode::Replace => mask,
        };
        if mask != 0 {
            self.surface.write_byte(byte_x, y, mask, planes);
        }
    }

    /// Clip `rect` to the active region; None when nothing is left to draw
    #[inline]
    fn clipped(&self, rect: &Rect) -> Option<(Rect, ClipStatus)> {
        let mut r = *rect;
        let status = r.clip(&self.clip);
        if status.is_rejected() || r.is_empty() {
            return None;
        }
        Some((r, status))
    }

    /// Write the pen color into the bits of `mask`
    #[inline]
    fn write_pen(&mut self, byte_x: i32, y: i32, mask: u8) {
        self.write_planes(byte_x, y, mask, plane_fill(self.pen.color));
    }
}

impl Drop for Graphics {
    fn drop(&mut self) {
        log::info!("graphics released");
    }
}

/// Plane bytes that take `fg` where `bits` is 1 and `bg` where it is 0
#[inline]
fn select_planes(bits: u8, fg: ColorIndex, bg: ColorIndex) -> [u8; NUM_PLANES] {
    let fg = plane_fill(fg);
    let bg = plane_fill(bg);
    std::array::from_fn(|p| (fg[p] & bits) | (bg[p] & !bits))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::surface::SurfaceKind;

    /// A fresh context for each backend
    pub fn both(width: u32, height: u32) -> Vec<Graphics> {
        [SurfaceKind::Indexed, SurfaceKind::Planar]
            .into_iter()
            .map(|kind| {
                Graphics::init(&GraphicsConfig::new(width, height).with_backend(kind)).unwrap()
            })
            .collect()
    }

    /// Every pixel of the framebuffer, row-major
    pub fn snapshot(g: &Graphics) -> Vec<ColorIndex> {
        let mut out = Vec::new();
        for y in 0..g.height() {
            for x in 0..g.width() {
                out.push(g.pixel(x, y).unwrap_or(0xFF));
            }
        }
        out
    }

    /// Coordinates of every pixel with `color`
    pub fn pixels_of(g: &Graphics, color: ColorIndex) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..g.height() {
            for x in 0..g.width() {
                if g.pixel(x, y) == Some(color) {
                    out.push((x, y));
                }
            }
        }
        out
    }
}
