use std::io::Write;

use graph_lens::engine::{EngineConfig, GraphEngine};
use graph_lens::model::{EdgeKind, NodeKind, load_graph_file};
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_graph_and_feeds_engine() {
    let file = write_temp(
        r#"{
            "nodes": [
                { "id": "app", "kind": "scope", "group": "bin", "file_count": 4, "child_count": 2 },
                { "id": "app::ui", "kind": "module", "group": "bin", "entity_count": 12 },
                { "id": "app::ui::draw", "kind": "entity", "group": "bin", "description": "Paints a **frame**." }
            ],
            "links": [
                { "source": "app", "target": "app::ui", "kind": "contains" },
                { "from": "app::ui", "to": "app::ui::draw", "kind": "calls", "weight": 2.5 },
                { "from": "app::ui", "to": "nowhere" }
            ]
        }"#,
    );

    let data = load_graph_file(file.path()).expect("graph loads");
    assert_eq!(data.node_count(), 3);
    assert_eq!(data.edge_count(), 3);
    assert_eq!(data.nodes[0].kind, NodeKind::Scope);
    assert_eq!(data.edges[1].kind, EdgeKind::Calls);

    let mut engine = GraphEngine::with_default_profile(EngineConfig::default());
    engine.set_data(&data);
    assert_eq!(engine.graph().len(), 3);
    assert_eq!(engine.graph().edges().len(), 2);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.json");
    let error = load_graph_file(&path).expect_err("missing file fails");
    assert!(format!("{error:#}").contains("absent.json"));
}

#[test]
fn malformed_node_is_an_error() {
    let file = write_temp(r#"{ "nodes": [ { "id": "x", "kind": "galaxy" } ], "edges": [] }"#);
    let error = load_graph_file(file.path()).expect_err("unknown kind fails");
    assert!(format!("{error:#}").contains("invalid node or edge entry"));
}

#[test]
fn partial_config_file_keeps_defaults() {
    let file = write_temp(r#"{ "camera": { "max_zoom": 3.0 }, "render": { "show_labels": false } }"#);
    let config = EngineConfig::from_json_file(file.path()).expect("config loads");
    assert_eq!(config.camera.max_zoom, 3.0);
    assert!(!config.render.show_labels);
    assert_eq!(config.physics, EngineConfig::default().physics);
}
