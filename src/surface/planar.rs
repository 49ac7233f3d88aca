use super::{Surface, SurfaceKind, NUM_PLANES};
use crate::color::{plane_fill, ColorIndex};

/// Four-bitplane framebuffer laid out like VGA mode 12h memory
///
/// Plane `p` holds bit `p` of every pixel's color index, packed eight pixels
/// per byte with the MSB on the left. A pixel lives at byte
/// `y * stride + x / 8` under bit `0x80 >> (x % 8)`.
pub struct PlanarSurface {
    planes: [Vec<u8>; NUM_PLANES],
    stride: usize,
    width: u32,
    height: u32,
}

impl PlanarSurface {
    pub fn with_size(width: u32, height: u32) -> Self {
        let stride = width.div_ceil(8) as usize;
        let len = stride * height as usize;
        Self {
            planes: std::array::from_fn(|_| vec![0; len]),
            stride,
            width,
            height,
        }
    }

    /// Bytes per row in each plane
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw bytes of one bitplane
    pub fn plane(&self, p: usize) -> &[u8] {
        &self.planes[p]
    }

    /// Bits of the last byte column that fall inside the surface
    #[inline]
    fn edge_mask(&self, byte_x: usize) -> u8 {
        let first_x = byte_x as u32 * 8;
        let visible = self.width.saturating_sub(first_x).min(8);
        !(0xFFu8.checked_shr(visible).unwrap_or(0))
    }
}

impl Surface for PlanarSurface {
    #[inline]
    fn width(&self) -> i32 {
        self.width as i32
    }

    #[inline]
    fn height(&self) -> i32 {
        self.height as i32
    }

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Planar
    }

    fn pixel(&self, x: i32, y: i32) -> Option<ColorIndex> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let offset = y as usize * self.stride + (x as usize >> 3);
        let bit = 0x80u8 >> (x & 7);
        let mut color = 0;
        for (p, plane) in self.planes.iter().enumerate() {
            if plane[offset] & bit != 0 {
                color |= 1 << p;
            }
        }
        Some(color)
    }

    fn write_byte(&mut self, byte_x: i32, y: i32, mask: u8, planes: [u8; NUM_PLANES]) {
        if y < 0 || y >= self.height as i32 || byte_x < 0 || byte_x as usize >= self.stride {
            return;
        }
        let mask = mask & self.edge_mask(byte_x as usize);
        if mask == 0 {
            return;
        }

        // Latched read-modify-write: keep unmasked bits, replace masked ones
        let offset = y as usize * self.stride + byte_x as usize;
        for (plane, bits) in self.planes.iter_mut().zip(planes) {
            let latch = plane[offset];
            plane[offset] = (latch & !mask) | (bits & mask);
        }
    }

    fn fill(&mut self, color: ColorIndex) {
        for (plane, bits) in self.planes.iter_mut().zip(plane_fill(color)) {
            plane.fill(bits);
        }
    }
}
