//! Drives the frame generator over k = 1..=N
//!
//! The sequencer owns the output directory for the whole run: it is wiped
//! and recreated once, before the first frame, then filled with one
//! zero-padded file per step.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{
    error::Result,
    frame::{FrameGenerator, FrameStats},
    traits::{Exporter, GlyphRasterizer},
    types::ShapedGlyph,
};

/// What to do when a frame fails to render or export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and go on with the next step
    #[default]
    Continue,
    /// Stop the run and return the error
    Abort,
}

/// Result of one step
#[derive(Debug)]
pub struct StepOutcome {
    pub k: usize,
    pub path: PathBuf,
    pub result: std::result::Result<FrameStats, String>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything a run produced, in step order
#[derive(Debug, Default)]
pub struct SequenceReport {
    pub steps: Vec<StepOutcome>,
}

impl SequenceReport {
    pub fn succeeded(&self) -> usize {
        self.steps.iter().filter(|s| s.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.len() - self.succeeded()
    }
}

/// Writes the full step sequence into a fresh directory
#[derive(Debug, Clone)]
pub struct StepSequencer {
    output_dir: PathBuf,
    file_stem: String,
    pad_width: usize,
    policy: FailurePolicy,
    generator: FrameGenerator,
}

impl StepSequencer {
    pub fn new(output_dir: impl Into<PathBuf>, generator: FrameGenerator) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_stem: "step_".to_string(),
            pad_width: 2,
            policy: FailurePolicy::default(),
            generator,
        }
    }

    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    pub fn with_pad_width(mut self, width: usize) -> Self {
        self.pad_width = width;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output path for step `k`
    pub fn step_path(&self, k: usize, extension: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}{:0width$}.{}",
            self.file_stem,
            k,
            extension,
            width = self.pad_width
        ))
    }

    /// Remove the output directory if present, then create it empty
    pub fn reset_output_dir(&self) -> Result<()> {
        match fs::remove_dir_all(&self.output_dir) {
            Ok(()) => {},
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Reset the output directory and write one frame per shaped glyph.
    ///
    /// Directory errors are fatal. Frame errors are recorded in the report,
    /// or returned straight away under [`FailurePolicy::Abort`].
    pub fn run(
        &self,
        rasterizer: &mut dyn GlyphRasterizer,
        exporter: &dyn Exporter,
        text: &[u8],
        shaped: &[ShapedGlyph],
    ) -> Result<SequenceReport> {
        self.reset_output_dir()?;

        let mut report = SequenceReport::default();
        for k in 1..=shaped.len() {
            let path = self.step_path(k, exporter.extension());
            match self
                .generator
                .generate(rasterizer, exporter, text, shaped, k, &path)
            {
                Ok(stats) => {
                    log::info!("saved {} ({} glyphs)", path.display(), k);
                    if stats.skipped() > 0 {
                        log::debug!("step {}: {} units skipped", k, stats.skipped());
                    }
                    report.steps.push(StepOutcome {
                        k,
                        path,
                        result: Ok(stats),
                    });
                },
                Err(e) => {
                    log::warn!("failed to save {}: {}", path.display(), e);
                    if self.policy == FailurePolicy::Abort {
                        return Err(e);
                    }
                    report.steps.push(StepOutcome {
                        k,
                        path,
                        result: Err(e.to_string()),
                    });
                },
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_paths_are_zero_padded() {
        let seq = StepSequencer::new("out", FrameGenerator::default());
        assert_eq!(seq.step_path(3, "png"), Path::new("out").join("step_03.png"));
        assert_eq!(seq.step_path(12, "png"), Path::new("out").join("step_12.png"));
        assert_eq!(seq.step_path(123, "png"), Path::new("out").join("step_123.png"));
    }

    #[test]
    fn custom_stem_and_padding() {
        let seq = StepSequencer::new("o", FrameGenerator::default())
            .with_file_stem("frame-")
            .with_pad_width(4);
        assert_eq!(seq.step_path(7, "pgm"), Path::new("o").join("frame-0007.pgm"));
    }

    #[test]
    fn default_policy_continues() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Continue);
    }
}
