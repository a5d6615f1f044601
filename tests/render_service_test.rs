//! Tests for RenderService and the JSON panel writer

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tempfile::TempDir;

use hiermap::application::services::{DatasetService, RenderService};
use hiermap::application::ApplicationError;
use hiermap::domain::{Canvas, FormatHint, LayoutKind, Panel, TreeNode};
use hiermap::infrastructure::traits::{JsonPanelWriter, PanelRenderer, RealFileSystem};
use hiermap::util::testing;

/// Records the container of every panel it receives.
#[derive(Default)]
struct RecordingRenderer {
    seen: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl PanelRenderer for RecordingRenderer {
    fn render(&self, panel: &Panel) -> io::Result<()> {
        if self.fail_on == Some(panel.container.as_str()) {
            return Err(io::Error::new(io::ErrorKind::Other, "canvas unavailable"));
        }
        self.seen.lock().unwrap().push(panel.container.clone());
        Ok(())
    }
}

fn load(name: &str) -> TreeNode {
    testing::init_test_setup();
    DatasetService::new(Arc::new(RealFileSystem), FormatHint::Auto)
        .load_tree(&Path::new("tests/resources/datasets").join(name))
        .unwrap()
}

#[test]
fn given_tree_when_rendering_all_then_five_panels_in_fixed_order() {
    let renderer = Arc::new(RecordingRenderer::default());
    let service = RenderService::new(renderer.clone(), Canvas::default());

    let panels = service.render_all(&load("ids.json")).unwrap();

    let expected = vec!["treemap", "radial", "partition", "circlePacking", "sunburst"];
    assert_eq!(*renderer.seen.lock().unwrap(), expected);
    let kinds: Vec<_> = panels.iter().map(|p| p.layout).collect();
    assert_eq!(kinds, LayoutKind::ALL.to_vec());
}

#[test]
fn given_default_canvas_when_rendering_then_only_angular_panels_have_radius() {
    let service = RenderService::new(Arc::new(RecordingRenderer::default()), Canvas::default());

    let panels = service.panels(&load("ids.json"));

    for panel in &panels {
        assert_eq!((panel.width, panel.height), (1600.0, 1200.0));
        match panel.layout {
            LayoutKind::Radial | LayoutKind::Sunburst => assert_eq!(panel.radius, Some(600.0)),
            _ => assert_eq!(panel.radius, None),
        }
    }
}

#[test]
fn given_id_dataset_when_preparing_then_panel_root_is_summed_and_sorted() {
    let service = RenderService::new(Arc::new(RecordingRenderer::default()), Canvas::default());

    let panels = service.panels(&load("ids.json"));
    let root = &panels[0].root;

    assert_eq!(root.name, "root");
    assert_eq!(root.value, 40155.0);
    let flare = &root.children[0];
    let names: Vec<_> = flare.children.iter().map(|c| c.name.as_str()).collect();
    // animate (22952) outweighs analytics (17203)
    assert_eq!(names, vec!["animate", "analytics"]);
    assert_eq!(flare.children[0].value, 22952.0);
    assert_eq!(flare.children[1].value, 17203.0);
}

#[test]
fn given_population_dataset_when_preparing_then_regions_sorted_by_population() {
    let hierarchy = RenderService::prepare(&load("population.json"));

    let regions: Vec<_> = hierarchy
        .descendants()
        .into_iter()
        .filter(|n| n.depth == 1)
        .map(|n| (n.name.as_str(), n.value))
        .collect();
    assert_eq!(regions, vec![("Aragon", 675301.0), ("Catalunya", 495211.0)]);
    assert_eq!(hierarchy.total(), 1170512.0);
}

#[test]
fn given_failing_renderer_when_rendering_then_stops_at_failed_panel() {
    let renderer = Arc::new(RecordingRenderer {
        fail_on: Some("partition"),
        ..Default::default()
    });
    let service = RenderService::new(renderer.clone(), Canvas::default());

    let err = service.render_all(&load("ids.json")).unwrap_err();

    match err {
        ApplicationError::OperationFailed { context, .. } => assert!(context.contains("partition")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(*renderer.seen.lock().unwrap(), vec!["treemap", "radial"]);
}

#[test]
fn given_json_writer_when_rendering_then_writes_one_file_per_container() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("panels");
    let writer = Arc::new(JsonPanelWriter::new(Arc::new(RealFileSystem), &out));
    let service = RenderService::new(writer, Canvas::new(800.0, 600.0));

    service.render_all(&load("nested.json")).unwrap();

    for kind in LayoutKind::ALL {
        let path = out.join(format!("{}.json", kind.container()));
        assert!(path.exists(), "missing {}", path.display());
    }
    let sunburst: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("sunburst.json")).unwrap()).unwrap();
    assert_eq!(sunburst["layout"], "sunburst");
    assert_eq!(sunburst["radius"], 300.0);
    assert_eq!(sunburst["extent"][0], std::f64::consts::TAU);
    assert_eq!(sunburst["extent"][1], 300.0);
    assert_eq!(sunburst["root"]["name"], "flare");
    assert_eq!(sunburst["root"]["value"], 21691.0);

    let treemap: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("treemap.json")).unwrap()).unwrap();
    assert!(treemap.get("radius").is_none());
    assert_eq!(treemap["container"], "treemap");
    assert_eq!(treemap["padding"], 1.0);

    let packing: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("circlePacking.json")).unwrap())
            .unwrap();
    assert_eq!(packing["extent"], serde_json::json!([798.0, 598.0]));
    assert_eq!(packing["padding"], 1.5);
}
