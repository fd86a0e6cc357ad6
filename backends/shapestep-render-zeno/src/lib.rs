//! Zeno rasterizer: skrifa outlines turned into coverage bitmaps
//!
//! Outlines are drawn twice at once: as an SVG path string that zeno
//! rasterizes, and as a kurbo path that gives an exact bounding box. The
//! box is snapped outwards to whole pixels so the bitmap's left and top
//! bearings are integers, the same placement contract a FreeType glyph
//! slot exposes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use kurbo::Shape;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::DrawSettings;
use skrifa::MetadataProvider;

use shapestep_core::{
    error::{RenderError, Result},
    traits::{FontRef, GlyphRasterizer},
    types::{CodePoint, GlyphBitmap, GlyphId},
};

/// Glyph rasterizer bound to one font at one pixel size
///
/// Holds a scratch mask that every `load_glyph` call renders into, so a
/// rasterizer is an exclusively owned resource: one glyph load at a time.
pub struct ZenoRasterizer {
    font: Arc<dyn FontRef>,
    size_px: f32,
    font_id: u64,
    scratch: Vec<u8>,
}

impl ZenoRasterizer {
    /// Binds a rasterizer to `font` at `size_px` pixels per em
    pub fn new(font: Arc<dyn FontRef>, size_px: f32) -> Result<Self> {
        if !(size_px.is_finite() && size_px > 0.0) {
            return Err(RenderError::InvalidDimensions {
                width: 0,
                height: 0,
            }
            .into());
        }
        skrifa::FontRef::from_index(font.data(), font.face_index())
            .map_err(|_| RenderError::InvalidFont)?;

        let mut hasher = DefaultHasher::new();
        font.data().hash(&mut hasher);
        font.face_index().hash(&mut hasher);

        Ok(Self {
            font_id: hasher.finish(),
            font,
            size_px,
            scratch: Vec::new(),
        })
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    fn font_ref(&self) -> Result<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(self.font.data(), self.font.face_index())
            .map_err(|_| RenderError::InvalidFont.into())
    }

    /// Horizontal advance in 26.6 at this size
    fn advance_26_6(&self, font_ref: &skrifa::FontRef<'_>, glyph_id: skrifa::GlyphId) -> i32 {
        font_ref
            .glyph_metrics(Size::new(self.size_px), LocationRef::default())
            .advance_width(glyph_id)
            .map(|adv| (adv * 64.0).round() as i32)
            .unwrap_or(0)
    }
}

impl GlyphRasterizer for ZenoRasterizer {
    fn name(&self) -> &'static str {
        "zeno"
    }

    fn font_id(&self) -> u64 {
        self.font_id
    }

    fn size_26_6(&self) -> i32 {
        (self.size_px * 64.0).round() as i32
    }

    fn char_index(&self, code_point: CodePoint) -> Option<GlyphId> {
        let font_ref = self.font_ref().ok()?;
        font_ref
            .charmap()
            .map(code_point)
            .map(|gid| gid.to_u32())
            .filter(|&gid| gid != 0)
    }

    fn load_glyph(&mut self, glyph_id: GlyphId) -> Result<GlyphBitmap> {
        use zeno::Mask;

        let (path_data, kurbo_path, advance_x) = {
            let font_ref = self.font_ref()?;
            let gid = skrifa::GlyphId::new(glyph_id);
            let outlines = font_ref.outline_glyphs();
            let glyph = outlines
                .get(gid)
                .ok_or(RenderError::GlyphNotFound(glyph_id))?;

            let mut builder = ZenoPathBuilder::new();
            let settings = DrawSettings::unhinted(Size::new(self.size_px), LocationRef::default());
            glyph
                .draw(settings, &mut builder)
                .map_err(|_| RenderError::OutlineExtractionFailed(glyph_id))?;

            let (path_data, kurbo_path) = builder.finish();
            (path_data, kurbo_path, self.advance_26_6(&font_ref, gid))
        };

        let bbox = kurbo_path.bounding_box();
        if kurbo_path.elements().is_empty()
            || !(bbox.x0.is_finite()
                && bbox.y0.is_finite()
                && bbox.x1.is_finite()
                && bbox.y1.is_finite())
        {
            return Ok(GlyphBitmap {
                advance_x,
                ..Default::default()
            });
        }

        let x0 = bbox.x0.floor() as i32;
        let y0 = bbox.y0.floor() as i32;
        let x1 = bbox.x1.ceil() as i32;
        let y1 = bbox.y1.ceil() as i32;
        let width = (x1 - x0).max(0) as u32;
        let height = (y1 - y0).max(0) as u32;
        if width == 0 || height == 0 {
            return Ok(GlyphBitmap {
                left: x0,
                top: y1,
                advance_x,
                ..Default::default()
            });
        }

        let pitch = width as usize;
        self.scratch.clear();
        self.scratch.resize(pitch * height as usize, 0);
        Mask::new(path_data.as_str())
            .size(width, height)
            .offset((-x0, -y0))
            .render_into(&mut self.scratch, None);

        // Font space is y-up; copy rows bottom to top.
        let mut buffer = Vec::with_capacity(self.scratch.len());
        for row in self.scratch.chunks_exact(pitch).rev() {
            buffer.extend_from_slice(row);
        }

        log::trace!(
            "zeno: glyph {} -> {}x{} at ({}, {})",
            glyph_id,
            width,
            height,
            x0,
            y1
        );

        Ok(GlyphBitmap {
            width,
            height,
            pitch,
            left: x0,
            top: y1,
            buffer,
            advance_x,
            advance_y: 0,
        })
    }
}

/// Outline pen producing a zeno SVG path and a kurbo path side by side
struct ZenoPathBuilder {
    commands: Vec<String>,
    kurbo_path: kurbo::BezPath,
}

impl ZenoPathBuilder {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
            kurbo_path: kurbo::BezPath::new(),
        }
    }

    fn finish(self) -> (String, kurbo::BezPath) {
        (self.commands.join(" "), self.kurbo_path)
    }
}

impl skrifa::outline::OutlinePen for ZenoPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(format!("M {:.2},{:.2}", x, y));
        self.kurbo_path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(format!("L {:.2},{:.2}", x, y));
        self.kurbo_path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.commands
            .push(format!("Q {:.2},{:.2} {:.2},{:.2}", cx, cy, x, y));
        self.kurbo_path
            .quad_to((cx as f64, cy as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.commands.push(format!(
            "C {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
            cx0, cy0, cx1, cy1, x, y
        ));
        self.kurbo_path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.commands.push("Z".to_string());
        self.kurbo_path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapestep_fontdb::{Font, DEFAULT_FONT_PATH};
    use skrifa::outline::OutlinePen;

    struct BytesFont(Vec<u8>);

    impl FontRef for BytesFont {
        fn data(&self) -> &[u8] {
            &self.0
        }

        fn units_per_em(&self) -> u16 {
            1000
        }

        fn glyph_id(&self, _ch: char) -> Option<u32> {
            None
        }
    }

    fn system_rasterizer(size: f32) -> Option<ZenoRasterizer> {
        let font = Font::from_file(DEFAULT_FONT_PATH).ok()?;
        ZenoRasterizer::new(Arc::new(font), size).ok()
    }

    #[test]
    fn test_rejects_invalid_font() {
        let font = Arc::new(BytesFont(vec![0; 64]));
        assert!(ZenoRasterizer::new(font, 48.0).is_err());
    }

    #[test]
    fn test_rejects_non_positive_size() {
        let Some(font) = Font::from_file(DEFAULT_FONT_PATH).ok() else {
            return;
        };
        assert!(ZenoRasterizer::new(Arc::new(font), 0.0).is_err());
    }

    #[test]
    fn test_path_builder_tracks_bounds() {
        let mut builder = ZenoPathBuilder::new();
        builder.move_to(1.0, -2.0);
        builder.line_to(5.5, -2.0);
        builder.quad_to(6.0, 4.0, 1.0, 3.0);
        builder.close();
        let (svg, path) = builder.finish();

        assert!(svg.starts_with("M 1.00,-2.00 L 5.50,-2.00 Q"));
        assert!(svg.ends_with('Z'));
        let bbox = path.bounding_box();
        assert_eq!(bbox.x0, 1.0);
        assert_eq!(bbox.y0, -2.0);
        assert!(bbox.y1 >= 3.0);
    }

    #[test]
    fn test_size_in_26_6() {
        let Some(r) = system_rasterizer(48.0) else {
            return;
        };
        assert_eq!(r.size_26_6(), 48 * 64);
        assert_eq!(r.name(), "zeno");
    }

    #[test]
    fn test_arabic_letter_renders_above_baseline() {
        let Some(mut r) = system_rasterizer(48.0) else {
            return;
        };
        let gid = r.char_index(0x0645).unwrap();
        let bitmap = r.load_glyph(gid).unwrap();

        assert!(bitmap.width > 0 && bitmap.height > 0);
        assert_eq!(bitmap.pitch, bitmap.width as usize);
        assert_eq!(bitmap.buffer.len(), bitmap.pitch * bitmap.height as usize);
        assert!(bitmap.buffer.iter().any(|&c| c > 0));
        assert!(bitmap.top > 0);
        assert!(bitmap.advance_x > 0);
        assert_eq!(bitmap.advance_y, 0);
    }

    #[test]
    fn test_space_is_blank_with_advance() {
        let Some(mut r) = system_rasterizer(48.0) else {
            return;
        };
        let Some(gid) = r.char_index(0x20) else {
            return;
        };
        let bitmap = r.load_glyph(gid).unwrap();
        assert!(bitmap.is_empty());
        assert!(bitmap.advance_x > 0);
    }

    #[test]
    fn test_unmapped_code_point_has_no_glyph() {
        let Some(r) = system_rasterizer(48.0) else {
            return;
        };
        // Private use area, not covered by the Arabic face.
        assert_eq!(r.char_index(0xE000), None);
    }

    #[test]
    fn test_out_of_range_glyph_id_errors() {
        let Some(mut r) = system_rasterizer(48.0) else {
            return;
        };
        assert!(r.load_glyph(u32::MAX - 1).is_err());
    }

    #[test]
    fn test_repeated_loads_are_identical() {
        let Some(mut r) = system_rasterizer(32.0) else {
            return;
        };
        let gid = r.char_index(0x0628).unwrap();
        let a = r.load_glyph(gid).unwrap();
        let b = r.load_glyph(gid).unwrap();
        assert_eq!(a, b);
    }
}
