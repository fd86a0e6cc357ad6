//! Pure Rust text shaping backend using harfrust
//!
//! Harfrust is a pure Rust port of HarfBuzz. This backend runs it once over
//! the whole input and converts the result into [`ShapedGlyph`]s with 26.6
//! offsets and advances at the requested pixel size, which is what a
//! FreeType-backed HarfBuzz font would report.

use std::str::FromStr;
use std::sync::Arc;

use harfrust::{
    Direction as HrDirection, Feature, FontRef as HrFontRef, GlyphBuffer, Language, Script,
    ShaperData, Tag, UnicodeBuffer,
};

use shapestep_core::{
    error::{Result, ShapingError},
    traits::{FontRef, Shaper},
    types::{Direction, ShapedGlyph},
    ShapingParams,
};

/// Pure Rust text shaping powered by harfrust
#[derive(Debug, Clone, Copy, Default)]
pub struct HarfrustShaper;

impl HarfrustShaper {
    pub fn new() -> Self {
        Self
    }

    /// Translates our direction enum to harfrust's format
    fn to_hr_direction(dir: Direction) -> HrDirection {
        match dir {
            Direction::LeftToRight => HrDirection::LeftToRight,
            Direction::RightToLeft => HrDirection::RightToLeft,
        }
    }

    /// Parse a 4-character tag string into a harfrust Tag
    fn parse_tag(tag_str: &str) -> Option<Tag> {
        let bytes = tag_str.as_bytes();
        if bytes.len() == 4 {
            Some(Tag::new(&[bytes[0], bytes[1], bytes[2], bytes[3]]))
        } else {
            None
        }
    }

    /// Font units to 26.6 pixels at `ppem`
    fn to_26_6(value: i32, ppem: f32, upem: u16) -> i32 {
        (value as f32 * ppem * 64.0 / upem as f32).round() as i32
    }

    /// Convert harfrust's font-unit output to scaled shaped glyphs
    fn extract_glyphs(buffer: &GlyphBuffer, ppem: f32, upem: u16) -> Vec<ShapedGlyph> {
        buffer
            .glyph_infos()
            .iter()
            .zip(buffer.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                x_offset: Self::to_26_6(pos.x_offset, ppem, upem),
                y_offset: Self::to_26_6(pos.y_offset, ppem, upem),
                x_advance: Self::to_26_6(pos.x_advance, ppem, upem),
                y_advance: Self::to_26_6(pos.y_advance, ppem, upem),
            })
            .collect()
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "harfrust"
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<Vec<ShapedGlyph>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let hr_font = HrFontRef::from_index(font.data(), font.face_index())
            .map_err(|_| ShapingError::InvalidFont)?;
        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data
            .shaper(&hr_font)
            .point_size(Some(params.size))
            .build();

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(Self::to_hr_direction(params.direction));

        if let Some(ref script_str) = params.script {
            let script = Self::parse_tag(script_str)
                .and_then(Script::from_iso15924_tag)
                .ok_or_else(|| ShapingError::ScriptNotSupported(script_str.clone()))?;
            buffer.set_script(script);
        }

        if let Some(ref lang) = params.language {
            let language = Language::from_str(lang)
                .map_err(|_| ShapingError::LanguageNotSupported(lang.clone()))?;
            buffer.set_language(language);
        }

        let features: Vec<Feature> = params
            .features
            .iter()
            .filter_map(|(name, value)| {
                Self::parse_tag(name).map(|tag| Feature {
                    tag,
                    value: *value,
                    start: 0,
                    end: u32::MAX,
                })
            })
            .collect();

        let output = shaper.shape(buffer, &features);
        let glyphs = Self::extract_glyphs(&output, params.size, font.units_per_em());
        log::debug!(
            "harfrust: {} bytes of text shaped into {} glyphs",
            text.len(),
            glyphs.len()
        );

        Ok(glyphs)
    }
}
