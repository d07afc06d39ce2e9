use std::collections::{HashMap, HashSet};

use eframe::egui::{Rect, Vec2};
use log::{debug, warn};

use super::config::PhysicsConfig;
use super::profile::NodeProfile;
use super::seed::seed_positions;
use crate::model::{EdgeKind, GraphData, Node};

#[derive(Clone, Debug)]
pub struct SimNode {
    pub node: Node,
    pub group: usize,
    pub radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub(super) seed: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimEdge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
    pub weight: f32,
    pub directed: bool,
}

#[cfg(test)]
impl SimEdge {
    pub(crate) fn test_edge(source: usize, target: usize, weight: f32) -> Self {
        Self {
            source,
            target,
            kind: EdgeKind::Related,
            weight,
            directed: true,
        }
    }
}

#[derive(Default)]
pub(super) struct PhysicsScratch {
    pub(super) forces: Vec<Vec2>,
    pub(super) positions: Vec<Vec2>,
    pub(super) radii: Vec<f32>,
    pub(super) groups: Vec<usize>,
    pub(super) centroids: Vec<Vec2>,
    pub(super) counts: Vec<u32>,
    pub(super) pairs: Vec<(usize, usize)>,
}

/// Flat simulation arena. Node indices are stable until the next rebuild.
pub struct SimGraph {
    pub(super) nodes: Vec<SimNode>,
    pub(super) edges: Vec<SimEdge>,
    pub(super) index_by_id: HashMap<String, usize>,
    pub(super) group_keys: Vec<String>,
    pub(super) outgoing: Vec<Vec<usize>>,
    pub(super) incoming: Vec<Vec<usize>>,
    pub(super) draw_order: Vec<usize>,
    pub(super) alpha: f32,
    pub(super) pinned: Option<usize>,
    pub(super) ticks: u64,
    pub(super) scratch: PhysicsScratch,
}

fn unique_nodes(data: &GraphData) -> Vec<&Node> {
    let mut seen = HashSet::with_capacity(data.nodes.len());
    let mut nodes = Vec::with_capacity(data.nodes.len());
    for node in &data.nodes {
        if seen.insert(node.id.as_str()) {
            nodes.push(node);
        } else {
            warn!("duplicate node id `{}` ignored", node.id);
        }
    }
    nodes
}

impl SimGraph {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index_by_id: HashMap::new(),
            group_keys: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            draw_order: Vec::new(),
            alpha: 0.0,
            pinned: None,
            ticks: 0,
            scratch: PhysicsScratch::default(),
        }
    }

    pub fn build(data: &GraphData, profile: &dyn NodeProfile, config: &PhysicsConfig) -> Self {
        let unique = unique_nodes(data);

        let mut group_keys: Vec<String> = Vec::new();
        let mut group_by_key: HashMap<&str, usize> = HashMap::new();
        let mut groups = Vec::with_capacity(unique.len());
        for node in &unique {
            let key = profile.group_key(node);
            let group = *group_by_key.entry(key).or_insert_with(|| {
                group_keys.push(key.to_string());
                group_keys.len() - 1
            });
            groups.push(group);
        }

        let ids = unique.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        let seeds = seed_positions(&ids, &groups, group_keys.len());

        let mut index_by_id = HashMap::with_capacity(unique.len());
        let nodes = unique
            .iter()
            .zip(groups)
            .zip(seeds)
            .enumerate()
            .map(|(index, ((node, group), seed))| {
                index_by_id.insert(node.id.clone(), index);
                SimNode {
                    node: (*node).clone(),
                    group,
                    radius: profile.radius(node),
                    position: seed,
                    velocity: Vec2::ZERO,
                    seed,
                }
            })
            .collect::<Vec<_>>();

        let mut graph = Self {
            nodes,
            index_by_id,
            group_keys,
            alpha: config.alpha_max,
            ..Self::empty()
        };
        graph.rebuild_edges(data);
        graph.rebuild_draw_order();
        debug!(
            "built simulation with {} nodes, {} edges, {} groups",
            graph.nodes.len(),
            graph.edges.len(),
            graph.group_keys.len()
        );
        graph
    }

    /// True when `data` carries the same node identities, kinds and groups,
    /// so positions can be kept.
    pub fn same_structure(&self, data: &GraphData, profile: &dyn NodeProfile) -> bool {
        let unique = unique_nodes(data);
        if unique.len() != self.nodes.len() {
            return false;
        }

        unique.iter().all(|node| {
            self.index_by_id.get(&node.id).is_some_and(|&index| {
                let current = &self.nodes[index];
                current.node.kind == node.kind
                    && self.group_keys[current.group] == profile.group_key(node)
            })
        })
    }

    /// Refreshes node metadata, radii and edges without touching positions.
    pub fn update_in_place(&mut self, data: &GraphData, profile: &dyn NodeProfile) {
        for node in unique_nodes(data) {
            if let Some(&index) = self.index_by_id.get(&node.id) {
                let entry = &mut self.nodes[index];
                entry.radius = profile.radius(node);
                entry.node = node.clone();
            }
        }
        self.rebuild_edges(data);
        self.rebuild_draw_order();
    }

    fn rebuild_edges(&mut self, data: &GraphData) {
        let mut edges = Vec::with_capacity(data.edges.len());
        let mut dropped = 0usize;
        for edge in &data.edges {
            let (Some(&source), Some(&target)) =
                (self.index_by_id.get(&edge.from), self.index_by_id.get(&edge.to))
            else {
                dropped += 1;
                continue;
            };
            if source == target {
                dropped += 1;
                continue;
            }

            edges.push(SimEdge {
                source,
                target,
                kind: edge.kind,
                weight: edge.effective_weight(),
                directed: edge.directed,
            });
        }
        if dropped > 0 {
            debug!("dropped {dropped} edges with missing endpoints or self loops");
        }

        let mut outgoing = vec![Vec::new(); self.nodes.len()];
        let mut incoming = vec![Vec::new(); self.nodes.len()];
        for edge in &edges {
            outgoing[edge.source].push(edge.target);
            incoming[edge.target].push(edge.source);
        }

        self.edges = edges;
        self.outgoing = outgoing;
        self.incoming = incoming;
    }

    fn rebuild_draw_order(&mut self) {
        self.draw_order.clear();
        self.draw_order.extend(0..self.nodes.len());
        self.draw_order
            .sort_by(|&a, &b| self.nodes[a].radius.total_cmp(&self.nodes[b].radius));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&SimNode> {
        self.nodes.get(index)
    }

    pub fn edges(&self) -> &[SimEdge] {
        &self.edges
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn group_count(&self) -> usize {
        self.group_keys.len()
    }

    pub fn group_key(&self, group: usize) -> Option<&str> {
        self.group_keys.get(group).map(String::as_str)
    }

    /// Back-to-front paint order; hit-testing walks it in reverse.
    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    /// Direct neighbors of `index` over edges in either direction.
    pub fn neighbors(&self, index: usize) -> HashSet<usize> {
        let mut neighbors = HashSet::new();
        if let (Some(outgoing), Some(incoming)) = (self.outgoing.get(index), self.incoming.get(index)) {
            neighbors.extend(outgoing.iter().copied());
            neighbors.extend(incoming.iter().copied());
        }
        neighbors.remove(&index);
        neighbors
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
    }

    pub fn pinned(&self) -> Option<usize> {
        self.pinned
    }

    pub(super) fn pin(&mut self, index: Option<usize>) {
        self.pinned = index.filter(|&index| index < self.nodes.len());
    }

    /// Moves a node and zeroes its velocity so the simulation does not fight
    /// the caller.
    pub fn place(&mut self, index: usize, position: Vec2) {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return;
        }
        if let Some(node) = self.nodes.get_mut(index) {
            node.position = position;
            node.velocity = Vec2::ZERO;
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        let first = self.nodes.first()?;
        let mut bounds = Rect::from_center_size(first.position.to_pos2(), Vec2::splat(first.radius * 2.0));
        for node in &self.nodes[1..] {
            bounds = bounds.union(Rect::from_center_size(
                node.position.to_pos2(),
                Vec2::splat(node.radius * 2.0),
            ));
        }
        Some(bounds)
    }
}
