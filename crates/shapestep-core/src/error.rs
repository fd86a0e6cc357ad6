//! Error types for shapestep

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShapestepError>;

/// Main error type for shapestep
#[derive(Debug, Error)]
pub enum ShapestepError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Shaping failed: {0}")]
    ShapingFailed(#[from] ShapingError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Invalid font data for shaping")]
    InvalidFont,

    #[error("Script not supported: {0}")]
    ScriptNotSupported(String),

    #[error("Language not supported: {0}")]
    LanguageNotSupported(String),
}

/// Rasterization errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid font data")]
    InvalidFont,

    #[error("Glyph not found: {0}")]
    GlyphNotFound(u32),

    #[error("Outline extraction failed for glyph {0}")]
    OutlineExtractionFailed(u32),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed: {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
