//! Domain layer: records, trees and the layout-facing hierarchy
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod tree;

pub use builder::{build_records, Normalized, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use hierarchy::{Hierarchy, HierarchyNode};
pub use layout::{Canvas, LayoutKind, Panel, PanelNode};
pub use tree::{Leaf, TreeNode, ROOT_NAME};
