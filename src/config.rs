//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/hiermap/hiermap.toml`
//! 3. Local config: `<project_dir>/.hiermap.toml`
//! 4. Environment variables: `HIERMAP_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Canvas, FormatHint};

/// Default dataset file.
pub const DEFAULT_INPUT: &str = "flare.json";
/// Default directory for rendered panels.
pub const DEFAULT_OUTPUT_DIR: &str = "panels";
/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".hiermap.toml";

/// Raw canvas for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCanvas {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<FormatHint>,
    pub canvas: RawCanvas,
}

/// Unified configuration for hiermap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Dataset to load when no input is given (default: flare.json)
    pub input: PathBuf,
    /// Directory receiving one JSON file per panel (default: panels)
    pub output_dir: PathBuf,
    /// Record format: auto, id or population
    pub format: FormatHint,
    /// Canvas shared by all panels
    pub canvas: Canvas,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: FormatHint::Auto,
            canvas: Canvas::default(),
        }
    }
}

/// Get the XDG config directory for hiermap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hiermap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("hiermap.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_FILE)
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is returned as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.input = PathBuf::from(expand_env_vars(self.input.to_string_lossy().as_ref()));
        self.output_dir = PathBuf::from(expand_env_vars(self.output_dir.to_string_lossy().as_ref()));
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            input: overlay.input.clone().unwrap_or_else(|| self.input.clone()),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            format: overlay.format.unwrap_or(self.format),
            canvas: Canvas {
                width: overlay.canvas.width.unwrap_or(self.canvas.width),
                height: overlay.canvas.height.unwrap_or(self.canvas.height),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/hiermap/hiermap.toml`
    /// 3. Local config: `<project_dir>/.hiermap.toml`
    /// 4. Environment variables: `HIERMAP_*` prefix, `__` separates nested keys
    ///    (e.g. `HIERMAP_CANVAS__WIDTH=800`)
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("config: global {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("config: local {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply HIERMAP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("HIERMAP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("input") {
            settings.input = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("format") {
            settings.format = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("canvas.width") {
            settings.canvas.width = parse_dimension("HIERMAP_CANVAS__WIDTH", &val)?;
        }
        if let Ok(val) = config.get_string("canvas.height") {
            settings.canvas.height = parse_dimension("HIERMAP_CANVAS__HEIGHT", &val)?;
        }

        Ok(settings)
    }

    /// Reject canvases that cannot hold a layout.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let Canvas { width, height } = self.canvas;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ApplicationError::Config {
                message: format!("canvas must be positive, got {width}x{height}"),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# hiermap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/hiermap/hiermap.toml
#   Local:  <project_dir>/.hiermap.toml
#   Env:    HIERMAP_* environment variables (HIERMAP_CANVAS__WIDTH=800)

# Dataset loaded when no input is given
# input = "flare.json"

# Directory for rendered panels (one <container>.json per layout)
# output_dir = "panels"

# Record format: "auto" sniffs the first record, "id" or "population" force it
# format = "auto"

[canvas]
# width = 1600.0
# height = 1200.0
"#
        .to_string()
    }
}

fn parse_dimension(var: &str, raw: &str) -> Result<f64, ApplicationError> {
    raw.trim().parse().map_err(|_| ApplicationError::Config {
        message: format!("{var} is not a number: {raw:?}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
