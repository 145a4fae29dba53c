//! The gradle-scrub command-line interface.
//!
//! Parses arguments, sets up logging, runs the recipe over the project and
//! reports the outcome.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ScrubArgs;
use crate::diagnostics::print_error;
use crate::recipe::{RecipeConfig, RunMode, Workspace};
use crate::ScrubError;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ScrubArgs::parse();
    init_tracing(args.verbose);

    if let Err(error) = execute(&args) {
        print_error(error);
        process::exit(1);
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "gradle_scrub=info",
        1 => "gradle_scrub=debug",
        _ => "gradle_scrub=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute(args: &ScrubArgs) -> Result<(), ScrubError> {
    let config = RecipeConfig::load(&args.config)?;
    let mut workspace = Workspace::load(&args.base_dir)?;
    if let Some(dialect) = args.dialect.dialect() {
        workspace = workspace.with_dialect(dialect);
    }
    output::print_parse_failures(&workspace);

    let mode = if args.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Write
    };
    let report = workspace.run(&config, mode)?;

    if args.dry_run {
        output::print_changes(&report.changes, args.color.into())
            .map_err(|e| err_msg!(Io, "failed to write diff: {}", e))?;
    }
    output::print_summary(&report);
    Ok(())
}
