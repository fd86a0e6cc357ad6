//! PNG export format
//!
//! Exports frames to PNG using the `image` crate.

use image::{ImageBuffer, ImageEncoder, RgbaImage};
use shapestep_core::{
    error::{ExportError, Result},
    traits::Exporter,
};

/// Encode a tightly packed RGBA8 raster as PNG.
///
/// The buffer must hold exactly `width * height * 4` bytes.
pub fn encode_rgba_to_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let expected_size = (width as usize) * (height as usize) * 4;
    if rgba.len() != expected_size {
        return Err(ExportError::EncodingFailed(format!(
            "Buffer size mismatch: expected {} bytes for {}x{} RGBA, got {}",
            expected_size,
            width,
            height,
            rgba.len()
        ))
        .into());
    }

    let img: RgbaImage = ImageBuffer::from_raw(width, height, rgba.to_vec()).ok_or_else(|| {
        ExportError::EncodingFailed("Failed to create image buffer from RGBA data".into())
    })?;

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Sub,
    );

    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

    Ok(png_data)
}

/// PNG exporter for frames
///
/// # Examples
///
/// ```
/// use shapestep_core::traits::Exporter;
/// use shapestep_export::PngExporter;
///
/// let exporter = PngExporter::new();
/// let png = exporter.export(1, 1, &[255, 255, 255, 255]).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
        encode_rgba_to_png(width, height, rgba)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}
