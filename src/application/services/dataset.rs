//! Dataset loading service
//!
//! Reads a JSON document and normalizes it into a tree.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::{FormatHint, Normalized, TreeBuilder, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// Service for loading and normalizing hierarchical datasets.
pub struct DatasetService {
    fs: Arc<dyn FileSystem>,
    builder: TreeBuilder,
}

impl DatasetService {
    /// Create a new dataset service.
    pub fn new(fs: Arc<dyn FileSystem>, format: FormatHint) -> Self {
        Self {
            fs,
            builder: TreeBuilder::new().with_format(format),
        }
    }

    /// Read a JSON file and normalize it.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Normalized> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read dataset", path)?;
        self.parse(&content, &path.display().to_string())
    }

    /// Normalize an in-memory JSON document, e.g. read from stdin.
    pub fn parse(&self, content: &str, source_name: &str) -> ApplicationResult<Normalized> {
        let document: Value = serde_json::from_str(content).with_source_context(source_name)?;
        debug!("parse: {} parsed", source_name);
        Ok(self.builder.build(document)?)
    }

    /// Like [`load`](Self::load), but always yields a tree.
    ///
    /// A pass-through document must already have the nested tree shape.
    pub fn load_tree(&self, path: &Path) -> ApplicationResult<TreeNode> {
        into_tree(self.load(path)?)
    }

    /// Like [`parse`](Self::parse), but always yields a tree.
    pub fn parse_tree(&self, content: &str, source_name: &str) -> ApplicationResult<TreeNode> {
        into_tree(self.parse(content, source_name)?)
    }
}

fn into_tree(normalized: Normalized) -> ApplicationResult<TreeNode> {
    match normalized {
        Normalized::Tree(tree) => Ok(tree),
        Normalized::PassThrough(document) => Ok(TreeNode::from_document(document)?),
    }
}
