//! Panel rendering service
//!
//! Prepares one panel per layout from the same tree and hands them to the renderer.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Canvas, Hierarchy, LayoutKind, Panel, TreeNode};
use crate::infrastructure::traits::PanelRenderer;

/// Service driving the five layout panels.
pub struct RenderService {
    renderer: Arc<dyn PanelRenderer>,
    canvas: Canvas,
}

impl RenderService {
    pub fn new(renderer: Arc<dyn PanelRenderer>, canvas: Canvas) -> Self {
        Self { renderer, canvas }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Summed and value-sorted hierarchy for a tree.
    pub fn prepare(tree: &TreeNode) -> Hierarchy {
        let mut hierarchy = Hierarchy::from_tree(tree);
        hierarchy.sum().sort_descending();
        hierarchy
    }

    /// Panels for all layouts in render order, without rendering them.
    pub fn panels(&self, tree: &TreeNode) -> Vec<Panel> {
        let hierarchy = Self::prepare(tree);
        LayoutKind::ALL
            .iter()
            .map(|&kind| Panel::new(kind, &self.canvas, &hierarchy))
            .collect()
    }

    /// Render every layout in fixed order. Stops at the first failing panel.
    #[instrument(level = "debug", skip(self, tree), fields(root = %tree.name))]
    pub fn render_all(&self, tree: &TreeNode) -> ApplicationResult<Vec<Panel>> {
        let panels = self.panels(tree);
        for panel in &panels {
            debug!("render_all: {}", panel.container);
            self.renderer
                .render(panel)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("render {} panel", panel.container),
                    source: Box::new(e),
                })?;
        }
        info!(
            "rendered {} panels ({}x{})",
            panels.len(),
            self.canvas.width,
            self.canvas.height
        );
        Ok(panels)
    }
}
