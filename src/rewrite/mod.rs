//! Rule-driven rewriting of parsed scripts.

pub mod context;
pub mod visitor;

pub use context::TraversalContext;
pub use visitor::{RemovalReason, Visitor};

use crate::rules::RuleSet;
use crate::tree::Script;

/// Applies `rules` to `script` with the default visitor.
pub fn rewrite(script: &Script, rules: &RuleSet) -> Script {
    Visitor::new(rules).visit_script(script)
}
