//! Layout kinds, canvas and the per-layout panel handed to a renderer.

use std::f64::consts::TAU;
use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::hierarchy::Hierarchy;

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: f64 = 1600.0;
/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: f64 = 1200.0;

/// The five layouts, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutKind {
    Treemap,
    Radial,
    Partition,
    CirclePacking,
    Sunburst,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 5] = [
        LayoutKind::Treemap,
        LayoutKind::Radial,
        LayoutKind::Partition,
        LayoutKind::CirclePacking,
        LayoutKind::Sunburst,
    ];

    /// Stable name of the container the panel mounts into.
    pub fn container(self) -> &'static str {
        match self {
            LayoutKind::Treemap => "treemap",
            LayoutKind::Radial => "radial",
            LayoutKind::Partition => "partition",
            LayoutKind::CirclePacking => "circlePacking",
            LayoutKind::Sunburst => "sunburst",
        }
    }

    /// Radial and sunburst lay nodes out by angle and radius.
    pub fn is_angular(self) -> bool {
        matches!(self, LayoutKind::Radial | LayoutKind::Sunburst)
    }

    /// Size the layout fills: `[angle, radius]` for angular layouts,
    /// `[width, height]` otherwise. Packing keeps a 1px margin on every side.
    pub fn extent(self, canvas: &Canvas) -> [f64; 2] {
        match self {
            LayoutKind::Radial | LayoutKind::Sunburst => [TAU, canvas.radius()],
            LayoutKind::CirclePacking => [canvas.width - 2.0, canvas.height - 2.0],
            LayoutKind::Treemap | LayoutKind::Partition => [canvas.width, canvas.height],
        }
    }

    /// Gap between sibling cells or circles.
    pub fn padding(self) -> f64 {
        match self {
            LayoutKind::Treemap => 1.0,
            LayoutKind::CirclePacking => 1.5,
            LayoutKind::Radial | LayoutKind::Partition | LayoutKind::Sunburst => 0.0,
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.container())
    }
}

/// Fixed-size drawing surface shared by all panels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Radius available to the angular layouts.
    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }
}

/// Aggregated node as exported to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelNode {
    pub name: String,
    pub value: f64,
    pub depth: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PanelNode>,
}

impl PanelNode {
    fn from_hierarchy(hierarchy: &Hierarchy, idx: Index) -> Option<Self> {
        let node = hierarchy.get_node(idx)?;
        Some(Self {
            name: node.name.clone(),
            value: node.value,
            depth: node.depth,
            height: node.height,
            children: node
                .children
                .iter()
                .filter_map(|&child| Self::from_hierarchy(hierarchy, child))
                .collect(),
        })
    }
}

/// Everything a renderer needs to draw one layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub layout: LayoutKind,
    pub container: String,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// See [`LayoutKind::extent`]
    pub extent: [f64; 2],
    pub padding: f64,
    pub root: PanelNode,
}

impl Panel {
    /// Snapshot a summed and sorted hierarchy for one layout.
    pub fn new(layout: LayoutKind, canvas: &Canvas, hierarchy: &Hierarchy) -> Self {
        let root = PanelNode::from_hierarchy(hierarchy, hierarchy.root()).unwrap_or_else(|| PanelNode {
            name: String::new(),
            value: 0.0,
            depth: 0,
            height: 0,
            children: Vec::new(),
        });
        Self {
            layout,
            container: layout.container().to_string(),
            width: canvas.width,
            height: canvas.height,
            radius: layout.is_angular().then(|| canvas.radius()),
            extent: layout.extent(canvas),
            padding: layout.padding(),
            root,
        }
    }
}
