//! Tests for HIERMAP_* environment overrides.
//!
//! The process environment is shared, so every test takes ENV_LOCK and
//! restores the variables it touched.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::TempDir;

use hiermap::config::{local_config_path, Settings};
use hiermap::domain::{Canvas, FormatHint};

static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 5] = [
    "HIERMAP_INPUT",
    "HIERMAP_OUTPUT_DIR",
    "HIERMAP_FORMAT",
    "HIERMAP_CANVAS__WIDTH",
    "HIERMAP_CANVAS__HEIGHT",
];

/// Run `f` with the given variables set and all other HIERMAP_* variables cleared.
fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<_> = VARS.iter().map(|k| (*k, std::env::var(k).ok())).collect();
    for key in VARS {
        std::env::remove_var(key);
    }
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    result
}

#[test]
fn given_env_vars_when_load_then_override_local_config() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "input = \"local.json\"\n[canvas]\nwidth = 900.0\nheight = 700.0\n",
    )
    .unwrap();

    let settings = with_env(
        &[
            ("HIERMAP_INPUT", "env.json"),
            ("HIERMAP_FORMAT", "population"),
            ("HIERMAP_CANVAS__WIDTH", "800"),
        ],
        || Settings::load(Some(project.path())).expect("load settings"),
    );

    assert_eq!(settings.input, PathBuf::from("env.json"));
    assert_eq!(settings.format, FormatHint::Population);
    // width from env, height from the local file
    assert_eq!(settings.canvas, Canvas::new(800.0, 700.0));
}

#[test]
fn given_output_dir_with_variable_when_load_then_expands() {
    let project = TempDir::new().unwrap();

    let settings = with_env(&[("HIERMAP_OUTPUT_DIR", "$HOME/panels")], || {
        Settings::load(Some(project.path())).expect("load settings")
    });

    let home = std::env::var("HOME").expect("HOME should be set");
    assert_eq!(settings.output_dir, PathBuf::from(home).join("panels"));
}

#[test]
fn given_non_numeric_canvas_width_when_load_then_config_error() {
    let project = TempDir::new().unwrap();

    let err = with_env(&[("HIERMAP_CANVAS__WIDTH", "abc")], || {
        Settings::load(Some(project.path())).unwrap_err()
    });

    assert!(err.to_string().contains("HIERMAP_CANVAS__WIDTH"), "{err}");
}

#[test]
fn given_unknown_format_when_load_then_config_error() {
    let project = TempDir::new().unwrap();

    let err = with_env(&[("HIERMAP_FORMAT", "csv")], || {
        Settings::load(Some(project.path())).unwrap_err()
    });

    assert!(err.to_string().contains("unknown format"), "{err}");
}

#[test]
fn given_zero_canvas_height_from_env_when_load_then_rejected() {
    let project = TempDir::new().unwrap();

    let err = with_env(&[("HIERMAP_CANVAS__HEIGHT", "0")], || {
        Settings::load(Some(project.path())).unwrap_err()
    });

    assert!(err.to_string().contains("canvas must be positive"));
}
