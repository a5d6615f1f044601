//! Conversion of trees into `termtree` for terminal display.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{Hierarchy, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// Label a node with its value, e.g. `cluster (3938)`.
pub fn format_label(name: &str, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} ({})", name, format_value(v)),
        None => name.to_string(),
    }
}

/// Integers print without a fractional part.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|c| c.to_tree_string())
            .collect();

        Tree::new(format_label(&self.name, self.value)).with_leaves(leaves)
    }
}

// Hierarchy labels show aggregated values in the hierarchy's current child order
impl TreeNodeConvert for Hierarchy {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(hierarchy: &Hierarchy, node_idx: Index) -> Tree<String> {
            match hierarchy.get_node(node_idx) {
                Some(node) => {
                    let leaves: Vec<_> = node
                        .children
                        .iter()
                        .map(|&child| build_tree(hierarchy, child))
                        .collect();
                    Tree::new(format_label(&node.name, Some(node.value))).with_leaves(leaves)
                }
                None => Tree::new("Empty tree".to_string()),
            }
        }

        build_tree(self, self.root())
    }
}
