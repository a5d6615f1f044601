//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DatasetService, RenderService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, JsonPanelWriter, PanelRenderer, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub dataset: DatasetService,
    pub render: RenderService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// Panels are written as JSON into `settings.output_dir`.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let renderer = Arc::new(JsonPanelWriter::new(
            Arc::clone(&fs),
            settings.output_dir.clone(),
        ));
        Self::with_deps(settings, fs, renderer)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        renderer: Arc<dyn PanelRenderer>,
    ) -> Self {
        let settings = Arc::new(settings);
        let dataset = DatasetService::new(Arc::clone(&fs), settings.format);
        let render = RenderService::new(renderer, settings.canvas);

        Self {
            settings,
            fs,
            dataset,
            render,
        }
    }
}
