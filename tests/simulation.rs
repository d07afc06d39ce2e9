use eframe::egui::{Rect, pos2, vec2};
use graph_lens::engine::{EngineConfig, GraphEngine, MonospaceMeasure};
use graph_lens::model::{Edge, GraphData, Node, NodeKind, NodeMetrics};

fn engine_for(data: &GraphData) -> GraphEngine {
    let mut engine = GraphEngine::with_default_profile(EngineConfig::default());
    engine.set_surface(Rect::from_min_size(pos2(0.0, 0.0), vec2(1024.0, 768.0)));
    engine.set_data(data);
    engine
}

fn scope(id: &str, group: &str, files: u32) -> Node {
    Node::new(id, NodeKind::Scope, group).with_metrics(NodeMetrics {
        file_count: files,
        ..NodeMetrics::default()
    })
}

#[test]
fn settled_layout_has_no_overlap() {
    let nodes = (0..24)
        .map(|index| scope(&format!("scope{index}"), &format!("g{}", index % 3), 20 + index * 5))
        .collect::<Vec<_>>();
    let edges = (0..24)
        .map(|index| Edge::new(format!("scope{index}"), format!("scope{}", (index + 5) % 24)))
        .collect();
    let data = GraphData::new(nodes, edges);
    let mut engine = engine_for(&data);
    for _ in 0..600 {
        engine.tick();
    }

    let padding = engine.config().physics.collision_padding;
    let nodes = engine.graph().nodes();
    for a in 0..nodes.len() {
        for b in (a + 1)..nodes.len() {
            let gap = (nodes[a].position - nodes[b].position).length();
            let required = nodes[a].radius + nodes[b].radius + padding;
            assert!(gap >= required - 0.5, "{a}/{b}: {gap} < {required}");
        }
    }
}

#[test]
fn linked_pair_settles_near_rest_length() {
    let data = GraphData::new(
        vec![Node::new("a", NodeKind::File, "core"), Node::new("b", NodeKind::File, "core")],
        vec![Edge::new("a", "b").with_weight(1.0)],
    );
    let mut engine = engine_for(&data);
    engine.place_node("a", vec2(-200.0, 0.0));
    engine.place_node("b", vec2(200.0, 0.0));
    for _ in 0..800 {
        engine.tick();
    }

    let rest = engine.config().physics.rest_length_same_group;
    let a = engine.node_position("a").unwrap_or_default();
    let b = engine.node_position("b").unwrap_or_default();
    let distance = (a - b).length();
    assert!(
        (distance - rest).abs() <= rest * 0.15,
        "distance {distance} too far from {rest}"
    );
}

#[test]
fn dangling_edges_are_ignored() {
    let data = GraphData::new(
        vec![Node::new("a", NodeKind::File, "core"), Node::new("b", NodeKind::File, "core")],
        vec![Edge::new("a", "missing"), Edge::new("missing", "b")],
    );
    let mut engine = engine_for(&data);
    assert!(engine.graph().edges().is_empty());
    for _ in 0..20 {
        engine.tick();
    }
    let scene = engine.render(&MonospaceMeasure::default());
    assert!(scene.edges.is_empty());
    for node in engine.graph().nodes() {
        assert!(node.position.x.is_finite() && node.position.y.is_finite());
    }
}

#[test]
fn empty_node_set_is_a_no_op() {
    let mut engine = engine_for(&GraphData::default());
    assert!(!engine.tick());
    assert!(engine.render(&MonospaceMeasure::default()).is_empty());
}

#[test]
fn seeded_nodes_never_coincide() {
    let nodes = (0..60)
        .map(|index| Node::new(format!("n{index}"), NodeKind::Entity, format!("g{}", index % 4)))
        .collect();
    let engine = engine_for(&GraphData::new(nodes, Vec::new()));
    let nodes = engine.graph().nodes();
    for a in 0..nodes.len() {
        for b in (a + 1)..nodes.len() {
            assert!((nodes[a].position - nodes[b].position).length() > 1.0);
        }
    }
}
