//! The contracts between the core pipeline and its collaborators
//!
//! - [`FontRef`] - Raw font bytes and the metrics loaders agree on
//! - [`Shaper`] - Where characters become positioned glyphs, once per run
//! - [`GlyphRasterizer`] - Where glyph ids become coverage bitmaps
//! - [`Exporter`] - Where finished frames become files

use crate::{
    error::Result,
    types::{CodePoint, GlyphBitmap, GlyphId, ShapedGlyph},
    ShapingParams,
};
use std::sync::Arc;

/// Your window into font data
///
/// ```ignore
/// struct MyFont {
///     data: Vec<u8>,
/// }
///
/// impl FontRef for MyFont {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         2048
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         Some(42)
///     }
/// }
/// ```
pub trait FontRef: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// Face index inside a collection, 0 for single fonts
    fn face_index(&self) -> u32 {
        0
    }

    /// The font's design grid size
    fn units_per_em(&self) -> u16;

    /// Find the glyph that represents this character
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// How many glyphs this font contains
    fn glyph_count(&self) -> Option<u32> {
        None
    }
}

/// Text shaping engine
///
/// Called exactly once per run; the result is immutable afterwards and is
/// read once per frame.
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Turn a text run into glyphs with 26.6 offsets and advances
    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<Vec<ShapedGlyph>>;
}

/// Glyph rasterization engine bound to one face at one pixel size
///
/// `load_glyph` takes `&mut self`: engines keep a single glyph slot that each
/// load overwrites, so only one caller may load at a time. The returned
/// bitmap is owned and stays valid after the next load.
pub trait GlyphRasterizer {
    /// Identify yourself in logs
    fn name(&self) -> &'static str;

    /// Stable identity of the bound face, used for cache keys
    fn font_id(&self) -> u64;

    /// Bound pixel size in 26.6 fixed point
    fn size_26_6(&self) -> i32;

    /// Character-to-glyph lookup; `None` when the font has no mapping
    fn char_index(&self, code_point: CodePoint) -> Option<GlyphId>;

    /// Load and render one glyph into an owned coverage bitmap
    fn load_glyph(&mut self, glyph_id: GlyphId) -> Result<GlyphBitmap>;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &mut R {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn font_id(&self) -> u64 {
        (**self).font_id()
    }

    fn size_26_6(&self) -> i32 {
        (**self).size_26_6()
    }

    fn char_index(&self, code_point: CodePoint) -> Option<GlyphId> {
        (**self).char_index(code_point)
    }

    fn load_glyph(&mut self, glyph_id: GlyphId) -> Result<GlyphBitmap> {
        (**self).load_glyph(glyph_id)
    }
}

/// Image encoder: RGBA8 pixels in, file bytes out
pub trait Exporter: Send + Sync {
    /// Who are you?
    fn name(&self) -> &'static str;

    /// Encode a tightly packed RGBA8 raster (`width * 4` bytes per row)
    fn export(&self, width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>>;

    /// What file extension should be used?
    fn extension(&self) -> &'static str;

    /// What MIME type identifies your format?
    fn mime_type(&self) -> &'static str;
}
