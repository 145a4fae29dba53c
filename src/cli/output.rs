//! User-facing output: the run summary and dry-run diffs.
//!
//! Results go to stdout; logs go to stderr through `tracing`.

use std::io::{self, Write};

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::recipe::{Change, RunReport, Workspace};
use crate::syntax::Print;

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints one line per script that failed to parse.
pub fn print_parse_failures(workspace: &Workspace) {
    for failure in workspace.failures() {
        println!("Failed to parse: {}", failure.path);
    }
}

/// Prints a line diff for every change of a dry run.
pub fn print_changes(changes: &[Change], color: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);
    for change in changes {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        writeln!(stdout, "--- {}", change.path)?;
        stdout.reset()?;
        let changeset = Changeset::new(&change.before.print(), &change.after.print(), "\n");
        print_diff(&mut stdout, &changeset.diffs)?;
    }
    Ok(())
}

pub fn print_summary(report: &RunReport) {
    println!("Processed {}", report.considered);
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            Difference::Same(text) => {
                stdout.reset()?;
                for line in text.lines() {
                    writeln!(stdout, " {line}")?;
                }
            }
            Difference::Add(text) => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                for line in text.lines() {
                    writeln!(stdout, "+{line}")?;
                }
            }
            Difference::Rem(text) => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                for line in text.lines() {
                    writeln!(stdout, "-{line}")?;
                }
            }
        }
    }
    stdout.reset()
}
