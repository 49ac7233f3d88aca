use super::{expand_byte, Surface, SurfaceKind, NUM_PLANES};
use crate::color::{palette_rgb, ColorIndex, NUM_COLORS};

/// Flat 8-bit indexed framebuffer, one palette index per pixel
/// This is the software equivalent of an SDL 8bpp surface
pub struct IndexedSurface {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl IndexedSurface {
    /// Create a new surface, cleared to index 0
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height) as usize],
            width,
            height,
        }
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Raw palette indices, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Surface for IndexedSurface {
    #[inline]
    fn width(&self) -> i32 {
        self.width as i32
    }

    #[inline]
    fn height(&self) -> i32 {
        self.height as i32
    }

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Indexed
    }

    #[inline]
    fn pixel(&self, x: i32, y: i32) -> Option<ColorIndex> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x as u32, y as u32)])
        } else {
            None
        }
    }

    fn write_byte(&mut self, byte_x: i32, y: i32, mask: u8, planes: [u8; NUM_PLANES]) {
        if y < 0 || y >= self.height as i32 || byte_x < 0 {
            return;
        }
        let base_x = byte_x * 8;
        if base_x >= self.width as i32 {
            return;
        }

        // Solid writes are the common case; skip per-bit plane decoding
        let solid = planes.iter().all(|&p| p == 0 || p == 0xFF);
        if mask == 0xFF && solid && base_x + 8 <= self.width as i32 {
            let color = planes
                .iter()
                .enumerate()
                .fold(0u8, |c, (p, &plane)| c | ((plane & 1) << p));
            let start = self.pixel_index(base_x as u32, y as u32);
            self.pixels[start..start + 8].fill(color);
            return;
        }

        for (i, color) in expand_byte(mask, planes) {
            let x = base_x + i;
            if x < self.width as i32 {
                let idx = self.pixel_index(x as u32, y as u32);
                self.pixels[idx] = color;
            }
        }
    }

    fn fill(&mut self, color: ColorIndex) {
        self.pixels.fill(color % NUM_COLORS as u8);
    }

    fn read_row(&self, y: i32, out: &mut [ColorIndex]) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let start = self.pixel_index(0, y as u32);
        let n = out.len().min(self.width as usize);
        out[..n].copy_from_slice(&self.pixels[start..start + n]);
    }

    fn to_rgba(&self, out: &mut [u8]) {
        for (dest, &index) in out.chunks_exact_mut(4).zip(self.pixels.iter()) {
            let (r, g, b) = palette_rgb(index);
            dest[0] = 255; // A
            dest[1] = b; // B
            dest[2] = g; // G
            dest[3] = r; // R
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{plane_fill, COLOR_RED, COLOR_WHITE};

    #[test]
    fn test_solid_byte_fast_path() {
        let mut s = IndexedSurface::with_size(24, 1);
        s.write_byte(1, 0, 0xFF, plane_fill(COLOR_RED));
        let expected: Vec<u8> = (0..24)
            .map(|x| if (8..16).contains(&x) { COLOR_RED } else { 0 })
            .collect();
        assert_eq!(s.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_to_rgba_layout() {
        let mut s = IndexedSurface::with_size(2, 1);
        s.fill(COLOR_WHITE);
        s.set_pixel(1, 0, COLOR_RED);
        let mut rgba = vec![0u8; 8];
        s.to_rgba(&mut rgba);
        assert_eq!(&rgba[..4], &[255, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&rgba[4..], &[255, 0x06, 0x08, 0xDD]);
    }
}
