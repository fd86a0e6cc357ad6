//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use shapestep_core::types::Direction;
use shapestep_fontdb::DEFAULT_FONT_PATH;

/// Text shown when none is given: "the Arabic language, hello"
pub const DEFAULT_TEXT: &str = "اللغة العربية مرحبا";

/// Shapestep - watch shaping happen one glyph at a time
///
/// Writes one PNG per shaped glyph. Each frame shows the first k code
/// points drawn without shaping above the first k shaped glyphs.
#[derive(Parser, Debug)]
#[command(name = "shapestep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Font file path (.ttf, .otf)
    #[arg(default_value = DEFAULT_FONT_PATH)]
    pub font: PathBuf,

    /// Text to shape and render
    #[arg(default_value = DEFAULT_TEXT)]
    pub text: String,

    /// Directory that receives the frames (cleared at start)
    #[arg(short = 'o', long = "output-dir", default_value = "output")]
    pub output_dir: PathBuf,

    /// Font size in pixels
    #[arg(short = 's', long = "font-size", default_value = "48", value_parser = parse_font_size)]
    pub font_size: f32,

    /// Frame width in pixels
    #[arg(short = 'W', long = "width", default_value = "800",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Frame height in pixels
    #[arg(short = 'H', long = "height", default_value = "400",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Text direction
    #[arg(short = 'd', long = "direction", value_enum, default_value_t = DirectionArg::Rtl)]
    pub direction: DirectionArg,

    /// Script tag (ISO 15924), or "auto" to let the shaper guess
    #[arg(short = 'S', long = "script", default_value = "arab")]
    pub script: String,

    /// Language tag (BCP 47), or "auto" to let the shaper guess
    #[arg(short = 'l', long = "language", default_value = "ar")]
    pub language: String,

    /// Stop at the first frame that fails to render or save
    #[arg(long = "abort-on-error", action = ArgAction::SetTrue)]
    pub abort_on_error: bool,

    /// Disable glyph bitmap cache (enabled by default)
    #[arg(long = "no-glyph-cache", action = ArgAction::SetTrue)]
    pub no_glyph_cache: bool,

    /// Print offsets, advances and pen position of every shaped glyph
    #[arg(long = "glyph-info", action = ArgAction::SetTrue)]
    pub glyph_info: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report warnings and errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    pub fn script_tag(&self) -> Option<String> {
        non_auto(&self.script)
    }

    pub fn language_tag(&self) -> Option<String> {
        non_auto(&self.language)
    }
}

/// Text direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    /// Left to right
    Ltr,
    /// Right to left
    Rtl,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Ltr => Direction::LeftToRight,
            DirectionArg::Rtl => Direction::RightToLeft,
        }
    }
}

fn non_auto(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() || tag.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(tag.to_string())
    }
}

fn parse_font_size(s: &str) -> Result<f32, String> {
    let size: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(format!("font size must be positive, got {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["shapestep"]).unwrap();
        assert_eq!(cli.font, PathBuf::from(DEFAULT_FONT_PATH));
        assert_eq!(cli.text, DEFAULT_TEXT);
        assert_eq!(cli.output_dir, PathBuf::from("output"));
        assert_eq!(cli.font_size, 48.0);
        assert_eq!((cli.width, cli.height), (800, 400));
        assert_eq!(cli.direction, DirectionArg::Rtl);
        assert_eq!(cli.script_tag().as_deref(), Some("arab"));
        assert_eq!(cli.language_tag().as_deref(), Some("ar"));
        assert!(!cli.abort_on_error && !cli.no_glyph_cache && !cli.glyph_info);
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn test_positional_font_and_text() {
        let cli = Cli::try_parse_from(["shapestep", "Amiri.ttf", "سلام", "-d", "ltr"]).unwrap();
        assert_eq!(cli.font, PathBuf::from("Amiri.ttf"));
        assert_eq!(cli.text, "سلام");
        assert_eq!(Direction::from(cli.direction), Direction::LeftToRight);
    }

    #[test]
    fn test_auto_tags_are_dropped() {
        let cli = Cli::try_parse_from(["shapestep", "-S", "auto", "-l", "AUTO"]).unwrap();
        assert_eq!(cli.script_tag(), None);
        assert_eq!(cli.language_tag(), None);
    }

    #[test]
    fn test_bad_sizes_are_rejected() {
        assert!(Cli::try_parse_from(["shapestep", "-s", "0"]).is_err());
        assert!(Cli::try_parse_from(["shapestep", "-s", "big"]).is_err());
        assert!(Cli::try_parse_from(["shapestep", "-W", "0"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["shapestep", "-v"]).unwrap();
        assert_eq!(cli.log_filter(), "debug");
        let cli = Cli::try_parse_from(["shapestep", "--quiet"]).unwrap();
        assert_eq!(cli.log_filter(), "warn");
        assert!(Cli::try_parse_from(["shapestep", "-v", "-q"]).is_err());
    }
}
