//! Recipe configuration and the run loop that applies it.

pub mod config;
pub mod driver;

pub use config::{RecipeConfig, RecipeEntry, RecipeGroup};
pub use driver::{
    apply_rule_group, select_working_set, Change, ChangeSet, ParseFailure, RunMode, RunReport,
    SourceFile, Workspace,
};
