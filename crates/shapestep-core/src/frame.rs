//! One comparison frame: unshaped line on top, shaped prefix below

use std::path::Path;

use crate::{
    error::{Result, ShapestepError},
    line::{LineRenderer, LineStats, PenState, DEFAULT_SPACE_ADVANCE},
    pixel_buffer::PixelBuffer,
    traits::{Exporter, GlyphRasterizer},
    types::ShapedGlyph,
    utf8, Color,
};

/// Frame geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Pen start and baseline of the unshaped line
    pub unshaped_origin: (i32, i32),
    /// Pen start and baseline of the shaped line
    pub shaped_origin: (i32, i32),
    /// Fixed advance for U+0020 on the unshaped line
    pub space_advance: i32,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            background: Color::white(),
            unshaped_origin: (50, 80),
            shaped_origin: (50, 280),
            space_advance: DEFAULT_SPACE_ADVANCE,
        }
    }
}

/// Per-line results for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStats {
    /// Prefix length this frame was drawn with
    pub k: usize,
    pub unshaped: LineStats,
    pub shaped: LineStats,
}

impl FrameStats {
    /// Units dropped across both lines
    pub fn skipped(&self) -> usize {
        self.unshaped.skipped + self.shaped.skipped
    }
}

/// Draws comparison frames for a fixed text and shaping result
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameGenerator {
    layout: FrameLayout,
}

impl FrameGenerator {
    pub fn new(layout: FrameLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Draw frame `k` into a fresh buffer.
    ///
    /// The unshaped line takes up to `k` code points of `text` and the
    /// shaped line exactly the first `k` glyphs of `shaped`. The two counts
    /// are matched for side-by-side viewing, not because a code point
    /// corresponds to a glyph.
    pub fn render(
        &self,
        rasterizer: &mut dyn GlyphRasterizer,
        text: &[u8],
        shaped: &[ShapedGlyph],
        k: usize,
    ) -> Result<(PixelBuffer, FrameStats)> {
        if k == 0 || k > shaped.len() {
            return Err(ShapestepError::Config(format!(
                "step {} out of range 1..={}",
                k,
                shaped.len()
            )));
        }

        let layout = &self.layout;
        let mut buffer =
            PixelBuffer::with_background(layout.width, layout.height, layout.background)?;
        let lines = LineRenderer::new(layout.space_advance);

        let (x, baseline) = layout.unshaped_origin;
        let unshaped = lines.render_unshaped(
            &mut buffer,
            rasterizer,
            utf8::decode(text),
            PenState::new(x, baseline),
            k,
        );

        let (x, baseline) = layout.shaped_origin;
        let shaped = lines.render_shaped(
            &mut buffer,
            rasterizer,
            &shaped[..k],
            PenState::new(x, baseline),
        );

        Ok((buffer, FrameStats { k, unshaped, shaped }))
    }

    /// Draw frame `k` and write it to `path` through `exporter`
    pub fn generate(
        &self,
        rasterizer: &mut dyn GlyphRasterizer,
        exporter: &dyn Exporter,
        text: &[u8],
        shaped: &[ShapedGlyph],
        k: usize,
        path: &Path,
    ) -> Result<FrameStats> {
        let (buffer, stats) = self.render(rasterizer, text, shaped, k)?;
        buffer.export(exporter, path)?;
        Ok(stats)
    }
}
