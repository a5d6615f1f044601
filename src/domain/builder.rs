//! Path-tree builder: flat dot-path records into a nested tree.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::domain::entities::{FlatRecord, FormatHint, RecordVariant};
use crate::domain::error::DomainResult;
use crate::domain::tree::TreeNode;

/// Result of normalizing an input document.
///
/// Serializes as the tree, or as the untouched input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    /// Records were folded into a tree
    Tree(TreeNode),
    /// Input was not a record batch and is returned unchanged
    PassThrough(Value),
}

/// Constructs nested trees from flat path records.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    hint: FormatHint,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force or sniff the record variant.
    pub fn with_format(mut self, hint: FormatHint) -> Self {
        self.hint = hint;
        self
    }

    /// Normalize a parsed JSON document.
    ///
    /// Arrays are folded into a tree when a variant can be chosen (forced by
    /// the hint, or sniffed from the first element). Every row is validated
    /// against that variant before the tree is built. Anything else is
    /// returned unchanged.
    #[instrument(level = "debug", skip(self, input))]
    pub fn build(&self, input: Value) -> DomainResult<Normalized> {
        let rows = match input {
            Value::Array(rows) => rows,
            other => {
                debug!("build: input is not an array, passing through");
                return Ok(Normalized::PassThrough(other));
            }
        };

        if rows.is_empty() {
            debug!("build: empty batch");
            return Ok(Normalized::Tree(TreeNode::root()));
        }

        let variant = match self.hint.forced().or_else(|| RecordVariant::sniff(&rows[0])) {
            Some(variant) => variant,
            None => {
                debug!("build: no path field on first record, passing through");
                return Ok(Normalized::PassThrough(Value::Array(rows)));
            }
        };
        debug!("build: {} records, variant={}", rows.len(), variant);

        let records = rows
            .iter()
            .enumerate()
            .map(|(index, row)| FlatRecord::from_json(index, row, variant))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Normalized::Tree(build_records(&records)))
    }
}

/// Fold validated records into a tree rooted at `root`.
///
/// Siblings are unique by name and kept in first-appearance order. The node a
/// path terminates at takes the record's value, replacing any earlier one.
pub fn build_records(records: &[FlatRecord]) -> TreeNode {
    let mut root = TreeNode::root();
    for record in records {
        let node = record
            .segments()
            .fold(&mut root, |node, segment| node.child_or_insert(segment));
        if node.value.is_some() {
            trace!("build_records: overwriting value at {}", record.path);
        }
        node.value = record.value;
    }
    root
}
