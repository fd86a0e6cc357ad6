//! RGBA canvas for a single frame
//!
//! Writes outside `[0, width) x [0, height)` are dropped without error. That
//! is the clipping policy for glyphs hanging off the frame edge.

use std::fs;
use std::path::Path;

use crate::{
    error::{ExportError, RenderError, Result},
    traits::Exporter,
    Color,
};

/// Fixed-size RGBA8 raster, row-major, 4 bytes per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    background: Color,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer filled with opaque white
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_background(width, height, Color::white())
    }

    /// Create a buffer filled with `background`
    pub fn with_background(width: u32, height: u32, background: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(RenderError::InvalidDimensions { width, height })?;

        let mut data = vec![0u8; len];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&[background.r, background.g, background.b, background.a]);
        }

        Ok(Self {
            width,
            height,
            background,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The flat color the buffer was created with
    pub fn background(&self) -> Color {
        self.background
    }

    /// Raw RGBA bytes, `width * 4` per row
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, keeping only its bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// Read back one pixel, `None` outside the buffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let idx = self.index(x, y)?;
        let px = &self.data[idx..idx + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Unconditional color write; a no-op outside the buffer
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if let Some(idx) = self.index(x, y) {
            self.data[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
        }
    }

    /// Lay black ink of the given coverage over the background color.
    ///
    /// Each color channel becomes `background * (1 - coverage / 255)` and
    /// alpha becomes 255. The existing pixel is not read: overlapping ink
    /// replaces rather than accumulates, and the result is only correct on
    /// the flat background. Coverage 0 leaves the pixel untouched.
    pub fn blend_pixel(&mut self, x: i32, y: i32, coverage: u8) {
        if coverage == 0 {
            return;
        }
        let Some(idx) = self.index(x, y) else {
            return;
        };

        let alpha = coverage as f32 / 255.0;
        let bg = self.background;
        self.data[idx] = (bg.r as f32 * (1.0 - alpha)) as u8;
        self.data[idx + 1] = (bg.g as f32 * (1.0 - alpha)) as u8;
        self.data[idx + 2] = (bg.b as f32 * (1.0 - alpha)) as u8;
        self.data[idx + 3] = 255;
    }

    /// Encode with `exporter` and write the result to `path`
    pub fn export(&self, exporter: &dyn Exporter, path: &Path) -> Result<()> {
        let bytes = exporter.export(self.width, self.height, &self.data)?;
        fs::write(path, bytes).map_err(|source| ExportError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}
