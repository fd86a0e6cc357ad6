//! PNG output decodes back to the exact frame pixels

use shapestep_core::{traits::Exporter, PixelBuffer};
use shapestep_export::PngExporter;

#[test]
fn frame_survives_png_round_trip() {
    let mut buffer = PixelBuffer::new(37, 11).unwrap();
    for x in 0..37 {
        buffer.blend_pixel(x, x % 11, (x * 7) as u8);
    }
    buffer.set_pixel(0, 10, 12, 34, 56, 78);

    let png = PngExporter::new()
        .export(buffer.width(), buffer.height(), buffer.data())
        .unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();

    assert_eq!(decoded.dimensions(), (37, 11));
    assert_eq!(decoded.as_raw().as_slice(), buffer.data());
}

#[test]
fn export_writes_decodable_file() {
    let mut path = std::env::temp_dir();
    path.push(format!("shapestep_export_{}.png", std::process::id()));

    let mut buffer = PixelBuffer::new(4, 3).unwrap();
    buffer.blend_pixel(2, 1, 255);
    buffer.export(&PngExporter::new(), &path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(2, 1).0, [0, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn export_to_missing_directory_fails() {
    let buffer = PixelBuffer::new(2, 2).unwrap();
    let path = std::env::temp_dir()
        .join("shapestep_no_such_dir_for_export")
        .join("frame.png");
    assert!(buffer.export(&PngExporter::new(), &path).is_err());
}
