//! Shapestep Core: glyph-by-glyph versus shaped rendering, one frame at a time
//!
//! Text enters twice. Once as raw UTF-8 bytes, decoded straight to code
//! points and rasterized without any shaping. Once as the output of a
//! shaping engine, where glyphs have been substituted, merged, reordered
//! and repositioned. Both lines land in the same [`PixelBuffer`], and the
//! [`StepSequencer`] repeats this for a growing prefix of the shaped run so
//! a viewer can watch shaping take effect glyph by glyph.
//!
//! ## The Pipeline
//!
//! 1. **Decode** - [`utf8::CodePoints`] walks the raw bytes
//! 2. **Shape** - a [`Shaper`] turns the text into [`types::ShapedGlyph`]s, once per run
//! 3. **Rasterize** - a [`GlyphRasterizer`] turns glyph ids into coverage bitmaps
//! 4. **Composite** - [`compositor::composite_glyph`] blends coverage onto the buffer
//! 5. **Lay out** - [`LineRenderer`] tracks the pen for each of the two lines
//! 6. **Export** - an [`Exporter`] encodes the finished frame
//!
//! ## Driving a run
//!
//! ```rust,no_run
//! use shapestep_core::{FrameGenerator, FrameLayout, StepSequencer};
//! # use shapestep_core::traits::*;
//! # use shapestep_core::types::*;
//! # fn collaborators() -> (Box<dyn GlyphRasterizer>, Box<dyn Exporter>, Vec<ShapedGlyph>) { unimplemented!() }
//!
//! let (mut rasterizer, exporter, shaped) = collaborators();
//! let sequencer = StepSequencer::new("output", FrameGenerator::new(FrameLayout::default()));
//! let report = sequencer.run(
//!     rasterizer.as_mut(),
//!     exporter.as_ref(),
//!     "مرحبا".as_bytes(),
//!     &shaped,
//! )?;
//! println!("{} frames written", report.succeeded());
//! # Ok::<(), shapestep_core::ShapestepError>(())
//! ```

pub mod compositor;
pub mod error;
pub mod frame;
pub mod glyph_cache;
pub mod line;
pub mod pixel_buffer;
pub mod sequencer;
pub mod traits;
pub mod utf8;

pub use error::{Result, ShapestepError};
pub use frame::{FrameGenerator, FrameLayout, FrameStats};
pub use glyph_cache::CachedRasterizer;
pub use line::{LineRenderer, LineStats, PenState};
pub use pixel_buffer::PixelBuffer;
pub use sequencer::{FailurePolicy, SequenceReport, StepOutcome, StepSequencer};
pub use traits::{Exporter, FontRef, GlyphRasterizer, Shaper};

/// The data structures shared by every stage
pub mod types {
    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// A decoded (possibly out-of-range) Unicode scalar value
    pub type CodePoint = u32;

    /// Truncates a 26.6 fixed-point value to whole pixels, toward zero
    #[inline]
    pub const fn trunc_26_6(value: i32) -> i32 {
        value / 64
    }

    /// Which way the text flows
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Direction {
        LeftToRight,
        RightToLeft,
    }

    /// One entry of a shaping engine's output.
    ///
    /// Offsets and advances are 26.6 fixed point (1/64 pixel).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShapedGlyph {
        pub glyph_id: GlyphId,
        /// Byte offset of the source cluster in the shaped text
        pub cluster: u32,
        pub x_offset: i32,
        pub y_offset: i32,
        pub x_advance: i32,
        pub y_advance: i32,
    }

    /// A rasterized glyph: 8-bit coverage plus placement metrics.
    ///
    /// `pitch` is the row stride in bytes and may exceed `width`.
    /// `left` is the distance from the pen to the bitmap's left edge,
    /// `top` the distance from the baseline up to its top edge (y-up).
    /// Advances are 26.6 fixed point.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct GlyphBitmap {
        pub width: u32,
        pub height: u32,
        pub pitch: usize,
        pub left: i32,
        pub top: i32,
        pub buffer: Vec<u8>,
        pub advance_x: i32,
        pub advance_y: i32,
    }

    impl GlyphBitmap {
        /// Coverage at (col, row), 0 when outside the bitmap or its buffer
        #[inline]
        pub fn coverage(&self, col: u32, row: u32) -> u8 {
            if col >= self.width || row >= self.height {
                return 0;
            }
            self.buffer
                .get(row as usize * self.pitch + col as usize)
                .copied()
                .unwrap_or(0)
        }

        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }
    }
}

/// How shaping should behave
#[derive(Debug, Clone)]
pub struct ShapingParams {
    /// Pixel size (ppem)
    pub size: f32,
    pub direction: types::Direction,
    /// ISO 15924 tag such as `arab`
    pub script: Option<String>,
    /// BCP 47 tag such as `ar`
    pub language: Option<String>,
    pub features: Vec<(String, u32)>,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            size: 48.0,
            direction: types::Direction::RightToLeft,
            script: Some("arab".to_string()),
            language: Some("ar".to_string()),
            features: Vec::new(),
        }
    }
}

/// Simple RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }
}
