//! Normalize flat dot-path records into a hierarchy and prepare it for
//! treemap, radial, partition, circle packing and sunburst layouts.
//!
//! Layers, innermost first: `domain` (records, trees, hierarchy),
//! `application` (services), `infrastructure` (I/O traits, wiring), `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{build_records, FlatRecord, Normalized, TreeBuilder, TreeNode};
