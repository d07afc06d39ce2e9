use eframe::egui::{Pos2, Rect, pos2, vec2};
use graph_lens::engine::{DrawCommand, EngineConfig, GraphEngine, MonospaceMeasure, Scene};
use graph_lens::model::{Edge, GraphData, Node, NodeKind};

fn surface() -> Rect {
    Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
}

fn engine_for(data: &GraphData) -> GraphEngine {
    let mut engine = GraphEngine::with_default_profile(EngineConfig::default());
    engine.set_surface(surface());
    engine.set_data(data);
    engine
}

fn render(engine: &GraphEngine) -> Scene {
    engine.render(&MonospaceMeasure::default())
}

fn texts(commands: &[DrawCommand]) -> Vec<String> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn tooltip_rect(scene: &Scene) -> Option<Rect> {
    scene.tooltip.iter().find_map(|command| match command {
        DrawCommand::Rect { rect, .. } => Some(*rect),
        _ => None,
    })
}

fn circle_alpha_at(scene: &Scene, center: Pos2) -> Option<u8> {
    scene.nodes.iter().find_map(|command| match command {
        DrawCommand::Circle {
            center: at, fill, ..
        } if at.distance(center) < 0.01 && fill.a() > 0 => Some(fill.a()),
        _ => None,
    })
}

#[test]
fn dangling_edge_draws_no_line() {
    let data = GraphData::new(
        vec![Node::new("a", NodeKind::File, "core")],
        vec![Edge::new("a", "ghost")],
    );
    let scene = render(&engine_for(&data));
    assert!(scene.edges.is_empty());
    assert!(!scene.nodes.is_empty());
}

#[test]
fn tooltip_opens_toward_the_roomier_side_and_stays_inside() {
    let data = GraphData::new(
        vec![Node::new("src/engine/scene.rs", NodeKind::File, "engine")
            .with_description("Builds **draw commands** for one frame.")],
        Vec::new(),
    );
    let mut engine = engine_for(&data);
    engine.place_node("src/engine/scene.rs", vec2(380.0, 290.0));
    engine.pointer_move(pos2(780.0, 590.0), &mut ());

    let scene = render(&engine);
    let rect = tooltip_rect(&scene).unwrap_or(Rect::NOTHING);
    assert!(surface().contains_rect(rect), "{rect:?} escapes the surface");
    assert!(rect.right() <= 780.0 - 7.0);

    let lines = texts(&scene.tooltip);
    assert_eq!(lines[0], "scene.rs");
    assert!(lines[1].starts_with("file"));
    assert_eq!(lines[2], "Builds draw commands for one frame.");
}

#[test]
fn selected_node_shows_tooltip_without_hover() {
    let data = GraphData::new(vec![Node::new("a", NodeKind::File, "core")], Vec::new());
    let mut engine = engine_for(&data);
    assert!(render(&engine).tooltip.is_empty());
    engine.set_selected(Some("a"));
    assert!(tooltip_rect(&render(&engine)).is_some());
}

#[test]
fn long_labels_are_truncated() {
    let long = "a_really_long_module_name_that_keeps_going";
    let data = GraphData::new(vec![Node::new(long, NodeKind::File, "core")], Vec::new());
    let mut engine = engine_for(&data);
    engine.place_node(long, vec2(0.0, 0.0));
    engine.camera_mut().zoom = 2.0;

    let labels = texts(&render(&engine).labels);
    let max_chars = engine.config().render.label_max_chars;
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].chars().count(), max_chars);
    assert!(labels[0].ends_with('…'));
}

#[test]
fn isolation_dims_everything_else() {
    let data = GraphData::new(
        vec![
            Node::new("a", NodeKind::File, "core"),
            Node::new("b", NodeKind::File, "core"),
            Node::new("c", NodeKind::File, "ui"),
        ],
        vec![Edge::new("a", "b"), Edge::new("b", "c")],
    );
    let mut engine = engine_for(&data);
    engine.place_node("a", vec2(-100.0, 0.0));
    engine.place_node("b", vec2(0.0, 0.0));
    engine.place_node("c", vec2(100.0, 0.0));
    engine.set_isolated(Some("a"));

    let scene = render(&engine);
    let focal = circle_alpha_at(&scene, pos2(300.0, 300.0)).unwrap_or_default();
    let neighbor = circle_alpha_at(&scene, pos2(400.0, 300.0)).unwrap_or_default();
    let outsider = circle_alpha_at(&scene, pos2(500.0, 300.0)).unwrap_or_default();
    assert_eq!(focal, 255);
    assert_eq!(neighbor, 255);
    assert!(outsider < 40, "outsider alpha {outsider}");

    engine.set_isolated(Some("a"));
    assert_eq!(engine.isolation().focal_id(), Some("a"));
    engine.set_isolated(None);
    let scene = render(&engine);
    assert_eq!(circle_alpha_at(&scene, pos2(500.0, 300.0)), Some(255));
}

#[test]
fn search_dims_non_matches() {
    let data = GraphData::new(
        vec![
            Node::new("camera", NodeKind::File, "core"),
            Node::new("physics", NodeKind::File, "core"),
        ],
        Vec::new(),
    );
    let mut engine = engine_for(&data);
    engine.place_node("camera", vec2(-100.0, 0.0));
    engine.place_node("physics", vec2(100.0, 0.0));
    engine.set_search("cam");

    let scene = render(&engine);
    let hit = circle_alpha_at(&scene, pos2(300.0, 300.0)).unwrap_or_default();
    let miss = circle_alpha_at(&scene, pos2(500.0, 300.0)).unwrap_or_default();
    assert_eq!(engine.search_match_count(), 1);
    assert!(hit > miss);
    assert!(texts(&scene.labels).contains(&"camera".to_string()));
}

fn circles_at(scene: &Scene, center: Pos2) -> usize {
    scene
        .nodes
        .iter()
        .filter(|command| matches!(command, DrawCommand::Circle { center: at, .. } if at.distance(center) < 0.01))
        .count()
}

#[test]
fn highlighted_node_gets_an_accent_ring() {
    let data = GraphData::new(
        vec![
            Node::new("a", NodeKind::File, "core"),
            Node::new("b", NodeKind::File, "core"),
        ],
        Vec::new(),
    );
    let mut engine = engine_for(&data);
    engine.place_node("a", vec2(-100.0, 0.0));
    engine.place_node("b", vec2(100.0, 0.0));
    let (left, right) = (pos2(300.0, 300.0), pos2(500.0, 300.0));

    let scene = render(&engine);
    assert_eq!((circles_at(&scene, left), circles_at(&scene, right)), (1, 1));

    engine.set_highlighted(Some("b"));
    let scene = render(&engine);
    assert_eq!((circles_at(&scene, left), circles_at(&scene, right)), (1, 2));
    let ring = scene.nodes.iter().find_map(|command| match command {
        DrawCommand::Circle {
            center,
            radius,
            fill,
            ..
        } if center.distance(right) < 0.01 && fill.a() == 0 => Some(*radius),
        _ => None,
    });
    assert!(ring.is_some_and(|radius| radius > engine.screen_radius(1)));

    engine.set_highlighted(Some("missing"));
    let scene = render(&engine);
    assert_eq!((circles_at(&scene, left), circles_at(&scene, right)), (1, 1));

    engine.set_highlighted(None);
    assert_eq!(circles_at(&render(&engine), right), 1);
}
