//! Shapestep CLI - shaped and unshaped text, one glyph at a time

mod cli;
mod run;

use std::process::ExitCode;

use clap::Parser;
use shapestep_core::ShapestepError;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    match run::run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(ShapestepError::FontLoad(e)) => {
            eprintln!("Error: cannot load font {}: {}", cli.font.display(), e);
            eprintln!("Usage: shapestep [FONT] [TEXT]");
            eprintln!(
                "Hint: pick a font with Arabic coverage, such as Amiri, Scheherazade or Noto Sans Arabic"
            );
            ExitCode::from(1)
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
