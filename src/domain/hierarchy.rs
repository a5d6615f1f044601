//! Arena-backed hierarchy for layouts: parent links, depth and height,
//! subtree sums and value-ordered children.

use std::cmp::Ordering;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::tree::TreeNode;

/// Node of the layout-facing hierarchy.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub name: String,
    /// Value carried by the source node itself
    pub own_value: Option<f64>,
    /// Own value plus all descendants, set by [`Hierarchy::sum`]
    pub value: f64,
    /// Distance from the root, 0 for the root
    pub depth: usize,
    /// Longest distance to a descendant leaf, 0 for leaves
    pub height: usize,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

/// Arena-based hierarchy built from a [`TreeNode`].
///
/// This is what layout algorithms consume: parent links, depth and height,
/// subtree sums and a deterministic child order.
#[derive(Debug)]
pub struct Hierarchy {
    arena: Arena<HierarchyNode>,
    root: Index,
}

impl Hierarchy {
    #[instrument(level = "debug", skip(tree), fields(root = %tree.name))]
    pub fn from_tree(tree: &TreeNode) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Self::node_for(tree, None, 0));
        let mut stack = vec![(tree, root)];

        while let Some((source, idx)) = stack.pop() {
            for child in source.children() {
                let depth = arena[idx].depth + 1;
                let child_idx = arena.insert(Self::node_for(child, Some(idx), depth));
                arena[idx].children.push(child_idx);
                stack.push((child, child_idx));
            }
        }

        let mut hierarchy = Self { arena, root };
        hierarchy.compute_heights();
        hierarchy
    }

    fn node_for(source: &TreeNode, parent: Option<Index>, depth: usize) -> HierarchyNode {
        HierarchyNode {
            name: source.name.clone(),
            own_value: source.value,
            value: 0.0,
            depth,
            height: 0,
            parent,
            children: Vec::with_capacity(source.children().len()),
        }
    }

    fn compute_heights(&mut self) {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let height = self.arena[idx]
                .children
                .iter()
                .map(|&child| self.arena[child].height + 1)
                .max()
                .unwrap_or(0);
            self.arena[idx].height = height;
        }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&HierarchyNode> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Aggregate values bottom-up: own value (absent counts as 0) plus children.
    #[instrument(level = "debug", skip(self))]
    pub fn sum(&mut self) -> &mut Self {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let children_total: f64 = self.arena[idx]
                .children
                .iter()
                .map(|&child| self.arena[child].value)
                .sum();
            let own = self.arena[idx].own_value.unwrap_or(0.0);
            self.arena[idx].value = own + children_total;
        }
        self
    }

    /// Order every child list by aggregated value, largest first.
    ///
    /// The sort is stable: equal values keep insertion order.
    #[instrument(level = "debug", skip(self))]
    pub fn sort_descending(&mut self) -> &mut Self {
        let parents: Vec<Index> = self.arena.iter().map(|(idx, _)| idx).collect();
        for idx in parents {
            let mut children = std::mem::take(&mut self.arena[idx].children);
            children.sort_by(|&a, &b| {
                self.arena[b]
                    .value
                    .partial_cmp(&self.arena[a].value)
                    .unwrap_or(Ordering::Equal)
            });
            self.arena[idx].children = children;
        }
        self
    }

    /// Aggregated value of the whole hierarchy.
    pub fn total(&self) -> f64 {
        self.arena[self.root].value
    }

    pub fn iter(&self) -> HierarchyIterator<'_> {
        HierarchyIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// All nodes in pre-order, root first.
    pub fn descendants(&self) -> Vec<&HierarchyNode> {
        self.iter().map(|(_, node)| node).collect()
    }

    /// Nodes without children in pre-order.
    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node)
            .collect()
    }

    /// Path from `idx` up to the root, `idx` first.
    pub fn ancestors(&self, idx: Index) -> Vec<&HierarchyNode> {
        let mut result = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            match self.arena.get(i) {
                Some(node) => {
                    result.push(node);
                    current = node.parent;
                }
                None => break,
            }
        }
        result
    }

    /// Number of levels, a lone root has depth 1.
    pub fn depth(&self) -> usize {
        self.arena[self.root].height + 1
    }
}

pub struct HierarchyIterator<'a> {
    hierarchy: &'a Hierarchy,
    stack: Vec<Index>,
}

impl<'a> HierarchyIterator<'a> {
    fn new(hierarchy: &'a Hierarchy) -> Self {
        Self {
            hierarchy,
            stack: vec![hierarchy.root],
        }
    }
}

impl<'a> Iterator for HierarchyIterator<'a> {
    type Item = (Index, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.hierarchy.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    hierarchy: &'a Hierarchy,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(hierarchy: &'a Hierarchy) -> Self {
        Self {
            hierarchy,
            stack: vec![(hierarchy.root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.hierarchy.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::build_records;
    use crate::domain::entities::FlatRecord;

    fn sample() -> TreeNode {
        build_records(&[
            FlatRecord::new("a.b", Some(5.0)),
            FlatRecord::new("a.c", Some(3.0)),
            FlatRecord::new("a", Some(10.0)),
            FlatRecord::new("d", Some(20.0)),
        ])
    }

    #[test]
    fn given_tree_when_building_hierarchy_then_sets_depth_and_height() {
        let h = Hierarchy::from_tree(&sample());
        let root = h.get_node(h.root()).unwrap();

        assert_eq!(h.len(), 5);
        assert_eq!(root.depth, 0);
        assert_eq!(root.height, 2);
        assert_eq!(h.depth(), 3);
        assert_eq!(h.leaves().len(), 3);
    }

    #[test]
    fn given_internal_value_when_summing_then_adds_own_and_children() {
        let mut h = Hierarchy::from_tree(&sample());
        h.sum();

        let a = h.descendants().into_iter().find(|n| n.name == "a").unwrap();
        assert_eq!(a.value, 18.0);
        assert_eq!(h.total(), 38.0);
    }

    #[test]
    fn given_summed_hierarchy_when_sorting_then_largest_first() {
        let mut h = Hierarchy::from_tree(&sample());
        h.sum().sort_descending();

        let names: Vec<_> = h.descendants().into_iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "d", "a", "b", "c"]);
    }

    #[test]
    fn given_equal_values_when_sorting_then_keeps_insertion_order() {
        let tree = build_records(&[
            FlatRecord::new("x", Some(1.0)),
            FlatRecord::new("y", Some(1.0)),
            FlatRecord::new("z", Some(1.0)),
        ]);
        let mut h = Hierarchy::from_tree(&tree);
        h.sum().sort_descending();

        let names: Vec<_> = h.leaves().into_iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[test]
    fn given_leaf_when_listing_ancestors_then_walks_to_root() {
        let h = Hierarchy::from_tree(&sample());
        let (leaf_idx, _) = h.iter().find(|(_, n)| n.name == "c").unwrap();

        let names: Vec<_> = h.ancestors(leaf_idx).into_iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "root"]);
    }
}
