//! Runs recipe groups over a project.
//!
//! A [`Workspace`] holds every discovered script in parsed form. Groups run
//! strictly in configured order and each sees the scripts as left by the
//! groups before it. Scripts that failed to parse take no part in any group.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::diagnostics::io_error;
use crate::discovery::{relative_path, ScriptDiscoverer};
use crate::recipe::config::{RecipeConfig, RecipeGroup};
use crate::rewrite::Visitor;
use crate::rules::RuleSet;
use crate::syntax::{parse, Dialect, Print};
use crate::tree::Script;
use crate::ScrubError;

/// A parsed script and its path relative to the project root.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub script: Script,
}

#[derive(Debug)]
pub struct ParseFailure {
    pub path: String,
    pub error: ScrubError,
}

/// A script whose printed form changed.
#[derive(Debug, Clone)]
pub struct Change {
    pub path: String,
    pub before: Script,
    pub after: Script,
}

pub type ChangeSet = Vec<Change>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Write rewritten scripts and delete obsolete files.
    Write,
    /// Compute everything, touch nothing on disk.
    DryRun,
}

/// Outcome of [`Workspace::run`].
#[derive(Debug, Default)]
pub struct RunReport {
    /// Scripts discovered, parsed or not.
    pub considered: usize,
    pub parse_failures: usize,
    /// Paths rewritten by at least one group.
    pub rewritten: BTreeSet<String>,
    /// Paths deleted by `remove-files` that existed.
    pub removed: Vec<String>,
    /// Every change, in the order groups produced them.
    pub changes: ChangeSet,
}

/// Visits each source once and collects the ones that changed.
pub fn apply_rule_group<'a>(
    sources: impl IntoIterator<Item = &'a SourceFile>,
    rules: &RuleSet,
) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for source in sources {
        let mut visitor = Visitor::new(rules);
        let after = visitor.visit_script(&source.script);
        if after.print() == source.script.print() {
            continue;
        }
        debug!(path = %source.path, removed = visitor.removed(), "script changed");
        changes.push(Change {
            path: source.path.clone(),
            before: source.script.clone(),
            after,
        });
    }
    changes
}

/// The sources a group may visit.
pub fn select_working_set<'a>(
    sources: &'a [SourceFile],
    files: Option<&'a [String]>,
) -> impl Iterator<Item = &'a SourceFile> {
    sources
        .iter()
        .filter(move |source| files.map_or(true, |files| files.contains(&source.path)))
}

#[derive(Debug)]
pub struct Workspace {
    base_dir: PathBuf,
    dialect: Dialect,
    sources: Vec<SourceFile>,
    failures: Vec<ParseFailure>,
    discovered: usize,
}

impl Workspace {
    /// Discovers and parses every build script under `base_dir`.
    ///
    /// Parse failures, including scripts that are not UTF-8, are recorded,
    /// not returned; unreadable files are fatal.
    pub fn load(base_dir: impl Into<PathBuf>) -> Result<Self, ScrubError> {
        let base_dir = base_dir.into();
        let paths = ScriptDiscoverer::discover_scripts(&base_dir)?;
        let dialect = ScriptDiscoverer::detect_project_dialect(&base_dir);
        info!(
            scripts = paths.len(),
            dialect = %dialect,
            base_dir = %base_dir.display(),
            "loading workspace"
        );

        let mut sources = Vec::new();
        let mut failures = Vec::new();
        for path in &paths {
            let bytes = fs::read(path).map_err(|e| io_error("read", path, e))?;
            let relative = relative_path(&base_dir, path);
            let script_dialect = ScriptDiscoverer::dialect_for(path);
            let parsed = String::from_utf8(bytes)
                .map_err(|e| err_msg!(Parse, "'{}' is not valid UTF-8", relative).caused_by(e))
                .and_then(|text| {
                    parse(&text, script_dialect)
                        .map_err(|error| error.with_source(&relative, text))
                });
            match parsed {
                Ok(script) => sources.push(SourceFile {
                    path: relative,
                    script,
                }),
                Err(error) => {
                    warn!(path = %relative, %error, "failed to parse");
                    failures.push(ParseFailure {
                        path: relative,
                        error,
                    });
                }
            }
        }

        Ok(Self {
            base_dir,
            dialect,
            sources,
            failures,
            discovered: paths.len(),
        })
    }

    /// Overrides the detected rule dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Applies every group of `config` in order.
    ///
    /// All groups are validated first, so a configuration error leaves the
    /// project untouched.
    pub fn run(&mut self, config: &RecipeConfig, mode: RunMode) -> Result<RunReport, ScrubError> {
        let groups = config.groups(self.dialect)?;
        let mut report = RunReport {
            considered: self.discovered,
            parse_failures: self.failures.len(),
            ..RunReport::default()
        };

        for group in &groups {
            self.run_group(group, mode, &mut report)?;
        }

        info!(
            considered = report.considered,
            rewritten = report.rewritten.len(),
            removed = report.removed.len(),
            "run finished"
        );
        Ok(report)
    }

    fn run_group(
        &mut self,
        group: &RecipeGroup,
        mode: RunMode,
        report: &mut RunReport,
    ) -> Result<(), ScrubError> {
        let working_set: Vec<&SourceFile> =
            select_working_set(&self.sources, group.files.as_deref()).collect();
        info!(group = %group.name, scripts = working_set.len(), "applying rule group");
        if let Some(files) = &group.files {
            for file in files {
                if !self.sources.iter().any(|s| &s.path == file) {
                    debug!(group = %group.name, path = %file, "restricted file not in working set");
                }
            }
        }

        let changes = apply_rule_group(working_set, &group.rules);
        for change in &changes {
            if mode == RunMode::Write {
                let path = self.base_dir.join(&change.path);
                fs::write(&path, change.after.print()).map_err(|e| io_error("write", &path, e))?;
            }
            info!(group = %group.name, path = %change.path, "rewrote script");
            if let Some(source) = self.sources.iter_mut().find(|s| s.path == change.path) {
                source.script = change.after.clone();
            }
            report.rewritten.insert(change.path.clone());
        }
        report.changes.extend(changes);

        for file in &group.remove_files {
            if self.remove_file(file, mode)? {
                info!(group = %group.name, path = %file, "removed file");
                report.removed.push(file.clone());
            }
            self.sources.retain(|s| &s.path != file);
        }
        Ok(())
    }

    /// Deletes `file` under the base directory. A missing file is not an
    /// error. Returns whether the file existed.
    fn remove_file(&self, file: &str, mode: RunMode) -> Result<bool, ScrubError> {
        let path = self.base_dir.join(file);
        if mode == RunMode::DryRun {
            return Ok(path.is_file());
        }
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("delete", &path, e)),
        }
    }
}
