//! 8-bit indexed BMP writer for framebuffer dumps

use std::fs;
use std::path::Path;

use crate::color::PALETTE;
use crate::surface::Surface;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;

/// Encode a surface as an uncompressed 8bpp BMP
///
/// Rows are stored bottom-up and padded to four bytes. The palette carries
/// all 16 colors plus the transparency key.
pub fn encode_bmp(surface: &dyn Surface) -> Vec<u8> {
    let width = surface.width().max(0) as u32;
    let height = surface.height().max(0) as u32;
    let row_size = (width + 3) & !3;
    let palette_size = PALETTE.len() as u32 * 4;
    let pixel_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + palette_size;
    let image_size = row_size * height;
    let file_size = pixel_offset + image_size;

    let mut out = Vec::with_capacity(file_size as usize);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&pixel_offset.to_le_bytes());

    // BITMAPINFOHEADER
    out.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&8u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes()); // 72 DPI
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&(PALETTE.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    for &(r, g, b) in &PALETTE {
        out.extend_from_slice(&[b, g, r, 0]);
    }

    let mut row = vec![0u8; row_size as usize];
    for y in (0..height as i32).rev() {
        row.fill(0);
        surface.read_row(y, &mut row[..width as usize]);
        out.extend_from_slice(&row);
    }

    out
}

/// Write a surface to `path` as a BMP file
pub fn save_bmp(surface: &dyn Surface, path: impl AsRef<Path>) -> Result<(), String> {
    let path = path.as_ref();
    fs::write(path, encode_bmp(surface)).map_err(|e| e.to_string())?;
    log::debug!(
        "saved {}x{} screenshot to {}",
        surface.width(),
        surface.height(),
        path.display()
    );
    Ok(())
}
