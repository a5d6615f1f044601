//! End-to-end wiring through ServiceContainer

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hiermap::config::Settings;
use hiermap::domain::{Canvas, FormatHint, Panel};
use hiermap::infrastructure::di::ServiceContainer;
use hiermap::infrastructure::traits::{FileSystem, PanelRenderer};
use hiermap::util::testing;

/// In-memory filesystem keyed by path.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct CollectingRenderer {
    panels: Mutex<Vec<Panel>>,
}

impl PanelRenderer for CollectingRenderer {
    fn render(&self, panel: &Panel) -> io::Result<()> {
        self.panels.lock().unwrap().push(panel.clone());
        Ok(())
    }
}

#[test]
fn given_settings_when_wiring_container_then_services_use_format_and_canvas() {
    testing::init_test_setup();
    let fs = Arc::new(MemoryFileSystem::with_file(
        "towns.json",
        r#"[{"ID": "Aragon.Huesca", "POBL_2022": 53956}, {"ID": "Aragon.Teruel", "POBL_2022": 35994}]"#,
    ));
    let renderer = Arc::new(CollectingRenderer::default());
    let settings = Settings {
        format: FormatHint::Population,
        canvas: Canvas::new(1000.0, 400.0),
        ..Default::default()
    };

    let container = ServiceContainer::with_deps(settings, fs, renderer.clone());
    let tree = container.dataset.load_tree(Path::new("towns.json")).unwrap();
    container.render.render_all(&tree).unwrap();

    let panels = renderer.panels.lock().unwrap();
    assert_eq!(panels.len(), 5);
    assert_eq!(panels[1].radius, Some(200.0));
    assert_eq!(panels[0].root.value, 89950.0);
    assert_eq!(panels[0].root.children[0].children[0].name, "Huesca");
    assert_eq!(container.render.canvas(), &Canvas::new(1000.0, 400.0));
}

#[test]
fn given_missing_dataset_when_loading_through_container_then_input_not_found() {
    let container = ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(MemoryFileSystem::default()),
        Arc::new(CollectingRenderer::default()),
    );

    let err = container.dataset.load(Path::new("absent.json")).unwrap_err();

    assert!(err.to_string().contains("absent.json"));
}
