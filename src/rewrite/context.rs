//! Per-traversal state threaded through the visitor by value.

use crate::tree::Call;

/// Name of the call that opens a plugin-declaration block.
pub const PLUGINS_BLOCK: &str = "plugins";

/// State visible to a node from its ancestors.
///
/// A fresh context starts every script traversal. Children receive the
/// value returned by [`TraversalContext::entering`]; siblings keep seeing
/// the caller's copy, so nothing leaks out of the subtree that set it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TraversalContext {
    pub in_plugin_block: bool,
}

impl TraversalContext {
    /// Context for the descendants of `call`.
    pub fn entering(self, call: &Call) -> Self {
        if call.simple_name() == PLUGINS_BLOCK {
            Self {
                in_plugin_block: true,
            }
        } else {
            self
        }
    }
}
