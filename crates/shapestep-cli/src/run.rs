//! Full shapestep run: load, shape once, write every step

use std::fmt::Write as _;
use std::sync::Arc;

use shapestep_core::{
    error::Result,
    traits::{FontRef, GlyphRasterizer, Shaper},
    types::ShapedGlyph,
    utf8, CachedRasterizer, FailurePolicy, FrameGenerator, FrameLayout, SequenceReport,
    ShapingParams, StepSequencer,
};
use shapestep_export::PngExporter;
use shapestep_fontdb::Font;
use shapestep_render_zeno::ZenoRasterizer;
use shapestep_shape_hr::HarfrustShaper;

use crate::cli::Cli;

/// Runs the pipeline described by `cli`.
///
/// A font that cannot be loaded fails before the output directory is
/// touched.
pub fn run(cli: &Cli) -> Result<SequenceReport> {
    log::debug!("Loading font from {}", cli.font.display());
    let font: Arc<dyn FontRef> = Arc::new(Font::from_file(&cli.font)?);

    let params = ShapingParams {
        size: cli.font_size,
        direction: cli.direction.into(),
        script: cli.script_tag(),
        language: cli.language_tag(),
        features: Vec::new(),
    };

    println!("Text: {}", cli.text);
    println!("Direction: {:?}", params.direction);

    let shaper = HarfrustShaper::new();
    log::debug!("Shaping with {} backend...", shaper.name());
    let shaped = shaper.shape(&cli.text, font.clone(), &params)?;

    println!();
    println!("=== Text statistics ===");
    println!("Code points: {}", utf8::count_code_points(cli.text.as_bytes()));
    println!("Shaped glyphs: {}", shaped.len());

    if cli.glyph_info {
        print!("{}", format_glyph_info(&shaped));
    }

    let layout = FrameLayout {
        width: cli.width,
        height: cli.height,
        ..FrameLayout::default()
    };
    let policy = if cli.abort_on_error {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Continue
    };
    let sequencer = StepSequencer::new(cli.output_dir.clone(), FrameGenerator::new(layout))
        .with_policy(policy);

    let mut rasterizer = ZenoRasterizer::new(font, cli.font_size)?;
    let exporter = PngExporter::new();
    let text = cli.text.as_bytes();

    println!();
    println!("=== Writing {} frames ===", shaped.len());
    let report = if cli.no_glyph_cache {
        sequencer.run(&mut rasterizer, &exporter, text, &shaped)?
    } else {
        let mut cached = CachedRasterizer::new(rasterizer);
        let report = sequencer.run(&mut cached, &exporter, text, &shaped)?;
        let stats = cached.stats();
        log::debug!(
            "Glyph cache ({}): {} hits, {} misses, {:.1}% hit rate",
            cached.name(),
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0
        );
        report
    };

    print_summary(&report);
    Ok(report)
}

/// Per-glyph listing of ids, clusters and positions in pixels.
///
/// The position column is the running sum of x advances before the glyph.
pub fn format_glyph_info(glyphs: &[ShapedGlyph]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Glyph info ===");
    let _ = writeln!(out, "{} glyphs total\n", glyphs.len());

    let mut pen_x = 0i32;
    for (i, glyph) in glyphs.iter().enumerate() {
        let _ = writeln!(out, "Glyph {}:", i);
        let _ = writeln!(out, "  Glyph ID: {}", glyph.glyph_id);
        let _ = writeln!(out, "  Cluster: {}", glyph.cluster);
        let _ = writeln!(out, "  X offset: {} px", px(glyph.x_offset));
        let _ = writeln!(out, "  Y offset: {} px", px(glyph.y_offset));
        let _ = writeln!(out, "  X advance: {} px", px(glyph.x_advance));
        let _ = writeln!(out, "  Y advance: {} px", px(glyph.y_advance));
        let _ = writeln!(out, "  Position: {} px", px(pen_x));
        pen_x = pen_x.saturating_add(glyph.x_advance);
    }
    out
}

fn px(value_26_6: i32) -> f64 {
    value_26_6 as f64 / 64.0
}

fn print_summary(report: &SequenceReport) {
    for step in &report.steps {
        match &step.result {
            Ok(stats) => println!(
                "✓ {} ({} glyphs, {} skipped)",
                step.path.display(),
                stats.shaped.drawn(),
                stats.skipped()
            ),
            Err(message) => println!("✗ {}: {}", step.path.display(), message),
        }
    }
    println!();
    println!(
        "Done: {} frames written, {} failed",
        report.succeeded(),
        report.failed()
    );
    println!("Top line: first k code points, unshaped. Bottom line: first k shaped glyphs.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(glyph_id: u32, cluster: u32, x_advance: i32, x_offset: i32) -> ShapedGlyph {
        ShapedGlyph {
            glyph_id,
            cluster,
            x_offset,
            y_offset: 0,
            x_advance,
            y_advance: 0,
        }
    }

    #[test]
    fn test_glyph_info_lists_every_glyph() {
        let info = format_glyph_info(&[glyph(7, 4, 640, 0), glyph(9, 0, 96, -32)]);
        assert!(info.contains("2 glyphs total"));
        assert!(info.contains("Glyph 0:"));
        assert!(info.contains("Glyph 1:"));
        assert!(info.contains("  Glyph ID: 9"));
        assert!(info.contains("  Cluster: 4"));
        assert!(info.contains("  X offset: -0.5 px"));
        assert!(info.contains("  X advance: 1.5 px"));
    }

    #[test]
    fn test_glyph_info_position_runs_before_advance() {
        let info = format_glyph_info(&[glyph(1, 0, 640, 0), glyph(2, 1, 96, 0)]);
        let positions: Vec<&str> = info
            .lines()
            .filter(|l| l.trim_start().starts_with("Position"))
            .collect();
        assert_eq!(positions, vec!["  Position: 0 px", "  Position: 10 px"]);
    }

    #[test]
    fn test_glyph_info_empty() {
        let info = format_glyph_info(&[]);
        assert!(info.contains("0 glyphs total"));
        assert!(!info.contains("Glyph 0:"));
    }
}
