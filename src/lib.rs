//! gradle-scrub: rule-driven removal of unsupported constructs from Gradle
//! build scripts.
//!
//! Scripts are parsed losslessly ([`syntax`]), filtered by a [`rules::RuleSet`]
//! through the [`rewrite::Visitor`], and printed back. The [`recipe`] module
//! reads the YAML rule file and applies its groups to a whole project.

#[macro_use]
pub mod diagnostics;

pub mod cli;
pub mod discovery;
pub mod recipe;
pub mod rewrite;
pub mod rules;
pub mod syntax;
pub mod tree;

pub use crate::diagnostics::{ErrorContext, ScrubError};
pub use crate::rules::RuleSet;
pub use crate::syntax::{parse, Dialect, Print};
