//! Owned nested tree produced by the path-tree builder.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::kind_of;
use crate::domain::error::{DomainError, DomainResult};

/// Name of the synthetic root node.
pub const ROOT_NAME: &str = "root";

/// Node of the normalized tree.
///
/// Each node exclusively owns its children. `index` maps a child name to its
/// position in `children` and is kept in sync on every insert; it is not
/// serialized and is rebuilt on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TreeNodeRepr")]
pub struct TreeNode {
    pub name: String,
    children: Vec<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct TreeNodeRepr {
    #[serde(default)]
    name: String,
    #[serde(default)]
    children: Vec<TreeNode>,
    #[serde(default)]
    value: Option<f64>,
}

impl From<TreeNodeRepr> for TreeNode {
    fn from(repr: TreeNodeRepr) -> Self {
        let mut index = HashMap::with_capacity(repr.children.len());
        for (pos, child) in repr.children.iter().enumerate() {
            // duplicate names in pre-built documents resolve to the first sibling
            index.entry(child.name.clone()).or_insert(pos);
        }
        Self {
            name: repr.name,
            children: repr.children,
            value: repr.value,
            index,
        }
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value && self.children == other.children
    }
}

/// Leaf of the tree with its dot path from the root (root excluded).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaf {
    pub path: String,
    pub value: Option<f64>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            value: None,
            index: HashMap::new(),
        }
    }

    /// Empty tree: a root without children.
    pub fn root() -> Self {
        Self::new(ROOT_NAME)
    }

    /// Read a document that already has the nested `{name, children, value}` shape.
    pub fn from_document(document: Value) -> DomainResult<Self> {
        if !document.is_object() {
            return Err(DomainError::UnsupportedShape(format!(
                "expected records with an id/ID field or a nested tree object, got {}",
                kind_of(&document)
            )));
        }
        serde_json::from_value(document).map_err(|e| DomainError::UnsupportedShape(e.to_string()))
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.index.get(name).map(|&pos| &self.children[pos])
    }

    /// Existing child by name, or a new one appended in insertion order.
    pub fn child_or_insert(&mut self, name: &str) -> &mut TreeNode {
        let pos = match self.index.get(name) {
            Some(&pos) => pos,
            None => {
                let pos = self.children.len();
                self.children.push(TreeNode::new(name));
                self.index.insert(name.to_string(), pos);
                pos
            }
        };
        &mut self.children[pos]
    }

    /// Look up a node by dot path relative to this node.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        path.split('.').try_fold(self, |node, segment| node.child(segment))
    }

    /// Number of nodes including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Number of levels, a lone node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Collects all leaf nodes (nodes with no children) with their dot paths.
    ///
    /// A childless root yields no leaves.
    pub fn leaves(&self) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        let mut path = Vec::new();
        for child in &self.children {
            child.collect_leaves(&mut path, &mut leaves);
        }
        leaves
    }

    fn collect_leaves<'a>(&'a self, path: &mut Vec<&'a str>, leaves: &mut Vec<Leaf>) {
        path.push(&self.name);
        if self.children.is_empty() {
            leaves.push(Leaf {
                path: path.join("."),
                value: self.value,
            });
        } else {
            for child in &self.children {
                child.collect_leaves(path, leaves);
            }
        }
        path.pop();
    }
}
