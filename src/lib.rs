//! Patater GUI Kit
//!
//! A small 16-color graphics kit: rectangle clipping, line, circle and
//! rounded-rectangle rasterization, and a blit engine for 1bpp masked
//! bitmaps and four-plane color bitmaps. Drawing goes to either a VGA-style
//! planar framebuffer or a flat indexed one with identical results.

pub mod color;
pub mod config;
#[cfg(feature = "sdl")]
pub mod display;
pub mod font;
pub mod graphics;
pub mod rect;
pub mod screenshot;
pub mod surface;

pub use color::{ColorIndex, Pattern, RasterOp, WriteMode};
pub use config::GraphicsConfig;
pub use font::{Font, Glyph};
pub use graphics::{Graphics, PenState};
pub use rect::{clip_rect_adjust, ClipStatus, Rect};
pub use surface::{IndexedSurface, PlanarSurface, Surface, SurfaceKind};
