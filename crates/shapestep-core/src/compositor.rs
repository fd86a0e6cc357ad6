//! Glyph compositing onto a [`PixelBuffer`]

use crate::{pixel_buffer::PixelBuffer, types::GlyphBitmap};

/// Blend every non-zero coverage value of `bitmap` into `buffer`, with the
/// bitmap's top-left pixel at (`x_pos`, `y_pos`).
///
/// Returns how many pixels were handed to [`PixelBuffer::blend_pixel`],
/// clipped ones included.
pub fn composite_glyph(
    buffer: &mut PixelBuffer,
    bitmap: &GlyphBitmap,
    x_pos: i32,
    y_pos: i32,
) -> usize {
    let mut blended = 0;
    for row in 0..bitmap.height {
        for col in 0..bitmap.width {
            let coverage = bitmap.coverage(col, row);
            if coverage == 0 {
                continue;
            }
            buffer.blend_pixel(
                x_pos.saturating_add(col as i32),
                y_pos.saturating_add(row as i32),
                coverage,
            );
            blended += 1;
        }
    }
    blended
}
