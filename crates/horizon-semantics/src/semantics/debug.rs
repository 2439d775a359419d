//! Human-readable dumps of the semantics cache.
//!
//! ```ignore
//! use horizon_semantics::SemanticsTreeDebug;
//!
//! let debug = SemanticsTreeDebug::new();
//! println!("{}", debug.format_tree(bridge.tree()));
//! ```

use std::collections::HashSet;

use horizon_semantics_core::{TreeFormatOptions, TreeStyle};

use super::node::{NodeId, SemanticsNode};
use super::tree::SemanticsTree;

/// Debug utility for visualizing the semantics tree.
#[derive(Debug, Clone, Default)]
pub struct SemanticsTreeDebug {
    options: TreeFormatOptions,
}

impl SemanticsTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TreeFormatOptions {
        &self.options
    }

    /// Format the tree reachable from the root.
    pub fn format_tree(&self, tree: &SemanticsTree) -> String {
        let mut output = format!("Semantics Tree ({} cached nodes):\n", tree.len());
        if tree.root().is_none() {
            output.push_str("  (empty)\n");
            return output;
        }
        let mut seen = HashSet::new();
        self.format_subtree_into(tree, NodeId::ROOT, 0, true, &mut seen, &mut output);
        output
    }

    /// Format the subtree below `id`.
    pub fn format_subtree(&self, tree: &SemanticsTree, id: NodeId) -> String {
        let mut output = String::new();
        let mut seen = HashSet::new();
        self.format_subtree_into(tree, id, 0, true, &mut seen, &mut output);
        output
    }

    fn format_subtree_into(
        &self,
        tree: &SemanticsTree,
        id: NodeId,
        depth: usize,
        is_last: bool,
        seen: &mut HashSet<NodeId>,
        output: &mut String,
    ) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(node) = tree.get(id) else {
            return;
        };
        if !seen.insert(id) {
            output.push_str(&self.options.node_prefix(depth, is_last));
            output.push_str(&format!("{id:?} (cycle)\n"));
            return;
        }

        output.push_str(&self.options.node_prefix(depth, is_last));
        output.push_str(&self.node_line(node));
        output.push('\n');

        if self.options.style != TreeStyle::Compact {
            for detail in self.detail_lines(node) {
                output.push_str(&self.options.detail_prefix(depth + 1));
                output.push_str(&detail);
                output.push('\n');
            }
        }

        let children = node.children_in_traversal_order();
        for (index, &child) in children.iter().enumerate() {
            let last = index + 1 == children.len();
            self.format_subtree_into(tree, child, depth + 1, last, seen, output);
        }
    }

    fn node_line(&self, node: &SemanticsNode) -> String {
        let mut line = String::new();
        if self.options.show_ids {
            line.push_str(&format!("{:?} ", node.id()));
        }
        match node.label() {
            Some(label) if !label.is_empty() => line.push_str(&format!("{label:?}")),
            _ => line.push_str("(unlabelled)"),
        }
        if let Some(value) = node.value().filter(|value| !value.is_empty()) {
            line.push_str(&format!(" = {value:?}"));
        }
        if node.is_hidden() {
            line.push_str(" (hidden)");
        }
        if self.options.style == TreeStyle::Compact && self.options.show_properties {
            line.push_str(&format!(" {:?}", node.flags()));
        }
        line
    }

    fn detail_lines(&self, node: &SemanticsNode) -> Vec<String> {
        let mut lines = Vec::new();
        if self.options.show_properties {
            if !node.flags().is_empty() {
                lines.push(format!("flags: {:?}", node.flags()));
            }
            if !node.actions().is_empty() {
                lines.push(format!("actions: {:?}", node.actions()));
            }
            if !node.custom_actions().is_empty() {
                lines.push(format!("custom actions: {:?}", node.custom_actions()));
            }
        }
        if self.options.show_geometry {
            let rect = node.rect();
            let bounds = node.global_bounds();
            lines.push(format!(
                "rect: ({}, {}, {}, {})",
                rect.left, rect.top, rect.right, rect.bottom
            ));
            lines.push(format!(
                "global bounds: ({}, {}, {}, {})",
                bounds.left, bounds.top, bounds.right, bounds.bottom
            ));
        }
        lines
    }
}
