//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, PanelRenderer)
//! but are themselves concrete structs, not traits.

mod dataset;
mod render;

pub use dataset::DatasetService;
pub use render::RenderService;
