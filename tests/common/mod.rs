//! # Shared Test Helpers
//!
//! Parsing shortcuts and throwaway Gradle projects for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use gradle_scrub::rewrite::rewrite;
use gradle_scrub::tree::Script;
use gradle_scrub::{parse, Dialect, Print, RuleSet};
use tempfile::TempDir;

pub fn groovy(source: &str) -> Script {
    parse(source, Dialect::Groovy).unwrap_or_else(|e| panic!("groovy parse failed: {e}"))
}

pub fn kotlin(source: &str) -> Script {
    parse(source, Dialect::Kotlin).unwrap_or_else(|e| panic!("kotlin parse failed: {e}"))
}

/// Parses, rewrites and prints `source`.
pub fn scrub(source: &str, dialect: Dialect, rules: &RuleSet) -> String {
    let script = parse(source, dialect).unwrap_or_else(|e| panic!("parse failed: {e}"));
    rewrite(&script, rules).print()
}

/// Creates a project directory holding `files` (relative path, contents).
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (path, contents) in files {
        write(dir.path(), path, contents);
    }
    dir
}

pub fn write(root: &Path, path: &str, contents: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(full, contents).expect("write file");
}

pub fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap_or_else(|e| panic!("read {path}: {e}"))
}
