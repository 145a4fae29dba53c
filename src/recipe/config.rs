//! The YAML rule file.
//!
//! ```yaml
//! strip-signing:
//!   recipe: remove
//!   files: [build.gradle.kts]
//!   remove-methods: [signing]
//!   remove-plugins: [org.jetbrains.dokka]
//!   remove-files: [publish.gradle]
//! ```
//!
//! Entries are applied in the order they appear in the file.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use miette::NamedSource;
use serde::Deserialize;
use serde_yaml::Mapping;
use tracing::warn;

use crate::diagnostics::io_error;
use crate::rules::RuleSet;
use crate::syntax::{Dialect, Span};
use crate::ScrubError;

/// The only recipe kind.
pub const REMOVE_RECIPE: &str = "remove";

/// One named entry of the rule file, as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecipeEntry {
    pub recipe: String,
    pub files: Option<Vec<String>>,
    pub remove_files: Option<Vec<String>>,
    pub remove_methods: Option<Vec<String>>,
    pub remove_plugins: Option<Vec<String>>,
    pub remove_classpath: Option<Vec<String>>,
    pub method_with_arg: Option<Vec<String>>,
    pub remove_import: Option<Vec<String>>,
    pub method_with_type_parameter: Option<Vec<String>>,
    /// Fields this version does not know about.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

/// A validated entry, ready to run.
#[derive(Debug, Clone)]
pub struct RecipeGroup {
    pub name: String,
    pub rules: RuleSet,
    /// Relative paths the group is limited to; `None` means every script.
    pub files: Option<Vec<String>>,
    pub remove_files: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeConfig {
    pub entries: Vec<(String, RecipeEntry)>,
}

impl RecipeConfig {
    pub fn load(path: &Path) -> Result<Self, ScrubError> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;
        Self::parse_named(&path.display().to_string(), &text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ScrubError> {
        Self::parse_named("recipe.yaml", text)
    }

    fn parse_named(name: &str, text: &str) -> Result<Self, ScrubError> {
        let root: Option<Mapping> = serde_yaml::from_str(text).map_err(|e| {
            let message = format!("invalid rule file: {e}");
            match e.location() {
                Some(location) => {
                    let source = Arc::new(NamedSource::new(name, text.to_string()));
                    let span = Span {
                        start: location.index(),
                        end: location.index(),
                    };
                    err_src!(Config, message, &source, span)
                }
                None => err_msg!(Config, message),
            }
        })?;

        let mut entries = Vec::new();
        for (key, value) in root.unwrap_or_default() {
            let Some(entry_name) = key.as_str().map(str::to_string) else {
                return Err(err_msg!(Config, "recipe entry names must be strings, found {:?}", key));
            };
            let entry: RecipeEntry = serde_yaml::from_value(value).map_err(|e| {
                err_msg!(Config, "invalid recipe entry '{}': {}", entry_name, e)
            })?;
            entries.push((entry_name, entry));
        }
        Ok(Self { entries })
    }

    /// Validates every entry and builds its rule set.
    ///
    /// Fails on the first entry whose recipe kind is unknown; nothing has
    /// been applied at that point.
    pub fn groups(&self, dialect: Dialect) -> Result<Vec<RecipeGroup>, ScrubError> {
        self.entries
            .iter()
            .map(|(name, entry)| entry.to_group(name, dialect))
            .collect()
    }
}

impl RecipeEntry {
    fn to_group(&self, name: &str, dialect: Dialect) -> Result<RecipeGroup, ScrubError> {
        if self.recipe != REMOVE_RECIPE {
            return Err(err_msg!(
                Config,
                "unknown recipe '{}' in entry '{}'",
                self.recipe,
                name
            ));
        }
        for field in self.unknown.keys() {
            warn!(entry = name, field = field.as_str(), "ignoring unknown field");
        }

        let list = |values: &Option<Vec<String>>| values.clone().unwrap_or_default();
        let rules = RuleSet::builder()
            .dialect(dialect)
            .plugins(list(&self.remove_plugins))
            .methods(list(&self.remove_methods))
            .classpath(list(&self.remove_classpath))
            .methods_with_arg(list(&self.method_with_arg))
            .imports(list(&self.remove_import))
            .type_parameters(list(&self.method_with_type_parameter))
            .build();

        // An empty list restricts nothing.
        let files = self
            .files
            .as_ref()
            .filter(|files| !files.is_empty())
            .map(|files| files.iter().map(|f| normalize(f)).collect());

        Ok(RecipeGroup {
            name: name.to_string(),
            rules,
            files,
            remove_files: list(&self.remove_files).iter().map(|f| normalize(f)).collect(),
        })
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches("./").to_string()
}
