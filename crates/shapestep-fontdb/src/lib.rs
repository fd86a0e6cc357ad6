//! Where fonts come to life: loading and validation for shapestep
//!
//! A font that fails to load is the one fatal error of a run, so everything
//! here is checked up front: the file must exist, parse as an OpenType font
//! (or the requested face of a collection) and carry a `head` table.
//!
//! Fonts keep their raw bytes and create parsers on demand.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use read_fonts::{FontRef as ReadFontRef, TableProvider};

use shapestep_core::{
    error::{FontLoadError, Result},
    traits::FontRef,
};

/// Font used when none is given on the command line
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/google-noto-vf/NotoSansArabic[wght].ttf";

/// A font loaded into memory
pub struct Font {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
    font_id: u64,
}

impl Font {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens a specific face from a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| {
            log::debug!("reading {} failed: {}", path.display(), e);
            FontLoadError::FileNotFound(path.display().to_string())
        })?;

        Self::from_data_index(data, face_index)
    }

    /// Turns raw font bytes into a font
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Turns raw font bytes into a specific face (for TTC collections)
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let font_ref =
            ReadFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;
        let units_per_em = font_ref
            .head()
            .map_err(|_| FontLoadError::InvalidData)?
            .units_per_em();

        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        face_index.hash(&mut hasher);
        let font_id = hasher.finish();

        Ok(Font {
            data,
            face_index,
            units_per_em,
            font_id,
        })
    }

    /// Hash of the font bytes and face index
    pub fn font_id(&self) -> u64 {
        self.font_id
    }

    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index).ok()
    }
}

impl FontRef for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch).map(|gid| gid.to_u32()))
    }

    fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.maxp().ok().map(|maxp| maxp.num_glyphs() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapestep_core::ShapestepError;

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = Font::from_data(vec![0; 100]);
        assert!(matches!(
            result,
            Err(ShapestepError::FontLoad(FontLoadError::InvalidData))
        ));
    }

    #[test]
    fn empty_bytes_are_rejected() {
        assert!(Font::from_data(Vec::new()).is_err());
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let result = Font::from_file("/definitely/not/here.ttf");
        match result {
            Err(ShapestepError::FontLoad(FontLoadError::FileNotFound(path))) => {
                assert!(path.contains("not/here.ttf"));
            },
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("missing file should not load"),
        }
    }

    #[test]
    fn system_font_loads_when_present() {
        let Ok(font) = Font::from_file(DEFAULT_FONT_PATH) else {
            return;
        };
        assert!(font.units_per_em() >= 16);
        assert!(font.glyph_count().unwrap_or(0) > 0);
        assert!(font.glyph_id('\u{0645}').is_some());
    }
}
