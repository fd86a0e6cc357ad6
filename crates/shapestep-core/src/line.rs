//! Line layout: walk a glyph source, move the pen, composite each glyph
//!
//! Two sources share one pen model. The unshaped path maps code points to
//! glyphs through the rasterizer's character map and advances by the
//! rasterizer's own metrics. The shaped path renders glyph ids straight from
//! the shaping result and advances by the shaper's (possibly kerned or
//! contextually adjusted) advances.
//!
//! The pen only moves in +x on screen even for right-to-left runs: shaped
//! glyphs come out of the shaper in visual order. Glyphs that cannot be
//! mapped or rendered are dropped and leave the pen where it was.

use crate::{
    compositor::composite_glyph,
    pixel_buffer::PixelBuffer,
    traits::GlyphRasterizer,
    types::{trunc_26_6, CodePoint, GlyphId, ShapedGlyph},
};

/// Code point that bypasses the rasterizer and uses a fixed advance
pub const SPACE: CodePoint = 0x20;

/// Advance used for [`SPACE`] when none is configured, in pixels
pub const DEFAULT_SPACE_ADVANCE: i32 = 20;

/// Pen position in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenState {
    pub pen_x: i32,
    pub pen_y: i32,
    pub baseline_y: i32,
}

impl PenState {
    pub fn new(pen_x: i32, baseline_y: i32) -> Self {
        Self {
            pen_x,
            pen_y: baseline_y,
            baseline_y,
        }
    }

    /// Move by a 26.6 advance, truncating each component to whole pixels
    #[inline]
    pub fn advance_26_6(&mut self, dx: i32, dy: i32) {
        self.pen_x += trunc_26_6(dx);
        self.pen_y += trunc_26_6(dy);
    }
}

/// Where one glyph landed: the bitmap's top-left corner in buffer space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBlit {
    pub glyph_id: GlyphId,
    pub x: i32,
    pub y: i32,
}

/// What happened while laying out one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Input units taken from the source (code points or shaped glyphs)
    pub consumed: usize,
    /// Spaces that moved the pen without drawing
    pub spaces: usize,
    /// Units dropped because mapping or rasterization failed
    pub skipped: usize,
    /// Glyphs that were rasterized and composited, in order
    pub blits: Vec<GlyphBlit>,
    /// Pen position after the last unit
    pub pen_x: i32,
    pub pen_y: i32,
}

impl LineStats {
    /// Number of glyphs actually drawn
    pub fn drawn(&self) -> usize {
        self.blits.len()
    }
}

/// Lays out single lines of glyphs into a [`PixelBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRenderer {
    space_advance: i32,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SPACE_ADVANCE)
    }
}

impl LineRenderer {
    pub fn new(space_advance: i32) -> Self {
        Self { space_advance }
    }

    pub fn space_advance(&self) -> i32 {
        self.space_advance
    }

    /// Render up to `max_units` code points without shaping.
    ///
    /// Spaces advance by the fixed space width and are never rasterized.
    /// Unmapped or unrenderable code points still count toward `max_units`.
    pub fn render_unshaped<I>(
        &self,
        buffer: &mut PixelBuffer,
        rasterizer: &mut dyn GlyphRasterizer,
        code_points: I,
        pen: PenState,
        max_units: usize,
    ) -> LineStats
    where
        I: IntoIterator<Item = CodePoint>,
    {
        let mut pen = pen;
        let mut stats = LineStats::default();

        for cp in code_points.into_iter().take(max_units) {
            stats.consumed += 1;

            if cp == SPACE {
                pen.pen_x += self.space_advance;
                stats.spaces += 1;
                continue;
            }

            let Some(glyph_id) = rasterizer.char_index(cp) else {
                log::debug!("{}: no glyph for U+{:04X}, skipped", rasterizer.name(), cp);
                stats.skipped += 1;
                continue;
            };

            let bitmap = match rasterizer.load_glyph(glyph_id) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    log::debug!("U+{:04X} (glyph {}) skipped: {}", cp, glyph_id, e);
                    stats.skipped += 1;
                    continue;
                },
            };

            let x = pen.pen_x + bitmap.left;
            let y = pen.pen_y - bitmap.top;
            composite_glyph(buffer, &bitmap, x, y);
            stats.blits.push(GlyphBlit { glyph_id, x, y });

            pen.advance_26_6(bitmap.advance_x, bitmap.advance_y);
        }

        stats.pen_x = pen.pen_x;
        stats.pen_y = pen.pen_y;
        stats
    }

    /// Render every glyph of `glyphs` with shaper-supplied placement.
    ///
    /// Pass a prefix slice to render only the first k glyphs.
    pub fn render_shaped(
        &self,
        buffer: &mut PixelBuffer,
        rasterizer: &mut dyn GlyphRasterizer,
        glyphs: &[ShapedGlyph],
        pen: PenState,
    ) -> LineStats {
        let mut pen = pen;
        let mut stats = LineStats::default();

        for glyph in glyphs {
            stats.consumed += 1;

            let bitmap = match rasterizer.load_glyph(glyph.glyph_id) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    log::debug!("shaped glyph {} skipped: {}", glyph.glyph_id, e);
                    stats.skipped += 1;
                    continue;
                },
            };

            let x = pen.pen_x + bitmap.left + trunc_26_6(glyph.x_offset);
            let y = pen.pen_y - bitmap.top + trunc_26_6(glyph.y_offset);
            composite_glyph(buffer, &bitmap, x, y);
            stats.blits.push(GlyphBlit {
                glyph_id: glyph.glyph_id,
                x,
                y,
            });

            pen.advance_26_6(glyph.x_advance, glyph.y_advance);
        }

        stats.pen_x = pen.pen_x;
        stats.pen_y = pen.pen_y;
        stats
    }
}
