//! CLI smoke tests for the shapestep binary

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use shapestep_fontdb::DEFAULT_FONT_PATH;

fn shapestep() -> Command {
    Command::new(env!("CARGO_BIN_EXE_shapestep"))
}

/// Unique scratch directory path (not created)
fn temp_dir(tag: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "shapestep_cli_{}_{}_{}",
        tag,
        std::process::id(),
        id
    ))
}

#[test]
fn test_help() {
    let output = shapestep()
        .arg("--help")
        .output()
        .expect("Failed to execute shapestep --help");

    assert!(output.status.success(), "--help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--glyph-info"));
}

#[test]
fn test_bad_font_fails_without_touching_output() {
    let out = temp_dir("badfont");
    let output = shapestep()
        .arg("/definitely/not/a/font.ttf")
        .arg("abc")
        .arg("--output-dir")
        .arg(&out)
        .output()
        .expect("Failed to execute shapestep");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: shapestep"), "stderr: {}", stderr);
    assert!(!out.exists(), "output dir must not be created");
}

#[test]
fn test_garbage_font_keeps_existing_output() {
    let out = temp_dir("garbage");
    fs::create_dir_all(&out).unwrap();
    let marker = out.join("keep.txt");
    fs::write(&marker, b"old").unwrap();
    let font = out.join("garbage.ttf");
    fs::write(&font, [0u8; 64]).unwrap();

    let output = shapestep()
        .arg(&font)
        .arg("--output-dir")
        .arg(&out)
        .output()
        .expect("Failed to execute shapestep");

    assert_eq!(output.status.code(), Some(1));
    assert!(marker.exists());
    fs::remove_dir_all(&out).unwrap();
}

#[test]
fn test_invalid_size_is_usage_error() {
    let output = shapestep()
        .args(["--font-size", "-3"])
        .output()
        .expect("Failed to execute shapestep");
    assert!(!output.status.success());
}

#[test]
fn test_renders_one_frame_per_glyph() {
    if !PathBuf::from(DEFAULT_FONT_PATH).exists() {
        return;
    }
    let out = temp_dir("render");
    let output = shapestep()
        .arg(DEFAULT_FONT_PATH)
        .arg("مرحبا")
        .arg("--output-dir")
        .arg(&out)
        .arg("--glyph-info")
        .output()
        .expect("Failed to execute shapestep");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Code points: 5"));
    assert!(stdout.contains("Glyph 0:"));

    let frames = fs::read_dir(&out).unwrap().count();
    assert!(frames > 0);
    assert!(out.join("step_01.png").exists());
    fs::remove_dir_all(&out).unwrap();
}
