//! Command-line arguments for gradle-scrub.
//!
//! Parsed with `clap`'s derive API.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::syntax::Dialect;

#[derive(Debug, Parser)]
#[command(
    name = "gradle-scrub",
    version,
    about = "Removes unsupported plugins, dependencies and calls from Gradle build scripts."
)]
pub struct ScrubArgs {
    /// The YAML rule file.
    #[arg(required = true)]
    pub config: PathBuf,

    /// Root directory of the Gradle project to rewrite.
    #[arg(required = true)]
    pub base_dir: PathBuf,

    /// Show the changes as diffs instead of writing them.
    #[arg(long)]
    pub dry_run: bool,

    /// Dialect the rules are applied in.
    #[arg(long, value_enum, default_value_t = DialectChoice::Auto)]
    pub dialect: DialectChoice,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// When to color diffs.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum DialectChoice {
    /// Kotlin unless the project root has a `build.gradle`.
    Auto,
    Groovy,
    Kotlin,
}

impl DialectChoice {
    pub fn dialect(self) -> Option<Dialect> {
        match self {
            DialectChoice::Auto => None,
            DialectChoice::Groovy => Some(Dialect::Groovy),
            DialectChoice::Kotlin => Some(Dialect::Kotlin),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for termcolor::ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => termcolor::ColorChoice::Auto,
            ColorMode::Always => termcolor::ColorChoice::Always,
            ColorMode::Never => termcolor::ColorChoice::Never,
        }
    }
}
