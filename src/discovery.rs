//! Build script discovery.
//!
//! Walks a project directory and collects every file that is a Gradle build
//! script in either dialect. Paths are returned sorted so that runs are
//! deterministic.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::syntax::Dialect;
use crate::ScrubError;

/// Script names recognised regardless of extension rules.
const WELL_KNOWN_SCRIPTS: &[&str] = &[
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
    "init.gradle",
    "init.gradle.kts",
];

/// Directories never searched: VCS metadata and Gradle's own caches.
const SKIPPED_DIRS: &[&str] = &[".git", ".gradle"];

#[derive(Debug)]
pub struct ScriptDiscoverer;

impl ScriptDiscoverer {
    // =====================
    // Public API
    // =====================

    /// Recursively collects the build scripts under `root`.
    pub fn discover_scripts<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, ScrubError> {
        let root = root.as_ref();
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !Self::is_skipped_dir(entry));
        for entry in walker {
            let entry = entry.map_err(|e| {
                err_msg!(Io, "failed to walk directory '{}': {}", root.display(), e)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !Self::is_build_script(path) {
                trace!(path = %path.display(), "skipping non-script file");
                continue;
            }

            files.push(path.to_path_buf());
        }
        files.sort();
        debug!(count = files.len(), root = %root.display(), "discovered build scripts");
        Ok(files)
    }

    /// Whether `path` names a Gradle build script.
    pub fn is_build_script(path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        WELL_KNOWN_SCRIPTS.contains(&name) || name.ends_with(".gradle") || name.ends_with(".gradle.kts")
    }

    /// The dialect a script is parsed in, decided by its extension.
    pub fn dialect_for(path: &Path) -> Dialect {
        let kotlin = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(".kts"));
        if kotlin {
            Dialect::Kotlin
        } else {
            Dialect::Groovy
        }
    }

    /// The dialect rules are applied in for a whole project: Groovy when the
    /// root holds a `build.gradle`, Kotlin otherwise.
    pub fn detect_project_dialect(root: &Path) -> Dialect {
        if root.join("build.gradle").is_file() {
            Dialect::Groovy
        } else {
            Dialect::Kotlin
        }
    }

    // =====================
    // Internal
    // =====================

    fn is_skipped_dir(entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| SKIPPED_DIRS.contains(&name))
    }
}

/// `path` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
