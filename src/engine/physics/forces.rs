use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;
use crate::engine::config::PhysicsConfig;
use crate::engine::sim::SimEdge;

#[derive(Clone, Copy)]
pub(super) struct RepulsionParams {
    pub(super) same_group: f32,
    pub(super) cross_group: f32,
    pub(super) min_distance: f32,
    pub(super) theta: f32,
}

impl RepulsionParams {
    pub(super) fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            same_group: config.repulsion_same_group,
            cross_group: config.repulsion_cross_group,
            min_distance: config.min_distance,
            theta: config.barnes_hut_theta,
        }
    }

    fn strength(self, group_a: usize, group_b: usize) -> f32 {
        if group_a == group_b {
            self.same_group
        } else {
            self.cross_group
        }
    }
}

/// Unit vector from `other` toward `index`. Coincident points get a fixed
/// per-pair direction that flips sign with the argument order.
pub(super) fn separation_direction(delta: Vec2, length: f32, index: usize, other: usize) -> Vec2 {
    if length > 0.0001 {
        return delta / length;
    }

    let (low, high) = (index.min(other), index.max(other));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214 + 0.11) * TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if index < other { direction } else { -direction }
}

fn repulsion_between(
    positions: &[Vec2],
    index: usize,
    other: usize,
    strength: f32,
    min_distance: f32,
) -> Vec2 {
    let delta = positions[index] - positions[other];
    let length = delta.length();
    let direction = separation_direction(delta, length, index, other);
    let distance = length.max(min_distance);
    direction * (strength / (distance * distance))
}

pub(super) fn accumulate_repulsion_exact(
    positions: &[Vec2],
    groups: &[usize],
    params: RepulsionParams,
    forces: &mut [Vec2],
) {
    for index in 0..positions.len() {
        for other in (index + 1)..positions.len() {
            let strength = params.strength(groups[index], groups[other]);
            let push = repulsion_between(positions, index, other, strength, params.min_distance);
            forces[index] += push;
            forces[other] -= push;
        }
    }
}

pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    groups: &[usize],
    params: RepulsionParams,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let strength = params.strength(groups[index], groups[other]);
            *force += repulsion_between(positions, index, other, strength, params.min_distance);
        }
        return;
    }

    let point = positions[index];
    let delta = point - node.center_of_mass;
    let distance = delta.length().max(params.min_distance);
    let can_approximate = !node.bounds.contains(point)
        && (node.bounds.side_length() / distance) < params.theta
        && node.mass > 1.0;

    if can_approximate {
        let strength = match node.group {
            Some(group) if group == groups[index] => params.same_group,
            _ => params.cross_group,
        };
        *force += (delta / distance) * (strength * node.mass / (distance * distance));
        return;
    }

    for child in node.children() {
        accumulate_repulsion_for_node(child, index, positions, groups, params, force);
    }
}

pub(super) fn accumulate_springs(
    edges: &[SimEdge],
    positions: &[Vec2],
    groups: &[usize],
    config: &PhysicsConfig,
    forces: &mut [Vec2],
) {
    let node_count = positions.len();
    for edge in edges {
        let (source, target) = (edge.source, edge.target);
        if source >= node_count || target >= node_count || source == target {
            continue;
        }

        let delta = positions[target] - positions[source];
        let length = delta.length();
        let direction = separation_direction(delta, length, target, source);
        let distance = length.max(config.min_distance);

        let rest_length = if groups[source] == groups[target] {
            config.rest_length_same_group
        } else {
            config.rest_length_cross_group
        };
        let stiffness = config.spring_stiffness * edge.weight.min(config.max_weight_factor);
        let pull = direction * ((distance - rest_length) * stiffness);

        forces[source] += pull;
        forces[target] -= pull;
    }
}

pub(super) fn accumulate_cohesion(
    positions: &[Vec2],
    groups: &[usize],
    cohesion: f32,
    centroids: &mut Vec<Vec2>,
    counts: &mut Vec<u32>,
    forces: &mut [Vec2],
) {
    if cohesion <= 0.0 {
        return;
    }

    let group_count = groups.iter().copied().max().map_or(0, |max| max + 1);
    centroids.clear();
    centroids.resize(group_count, Vec2::ZERO);
    counts.clear();
    counts.resize(group_count, 0);

    for (position, &group) in positions.iter().zip(groups) {
        centroids[group] += *position;
        counts[group] += 1;
    }
    for (centroid, &count) in centroids.iter_mut().zip(counts.iter()) {
        if count > 0 {
            *centroid /= count as f32;
        }
    }

    for ((force, position), &group) in forces.iter_mut().zip(positions).zip(groups) {
        if counts[group] > 1 {
            *force += (centroids[group] - *position) * cohesion;
        }
    }
}

pub(super) fn accumulate_gravity(positions: &[Vec2], gravity: f32, forces: &mut [Vec2]) {
    for (force, position) in forces.iter_mut().zip(positions) {
        *force -= *position * gravity;
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) padding: f32,
    pub(super) strength: f32,
    pub(super) iterations: usize,
}

fn push_candidate(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    padding: f32,
    pairs: &mut Vec<(usize, usize)>,
) {
    let reach = radii[from] + radii[to] + padding * 2.0;
    if (positions[from] - positions[to]).length_sq() < reach * reach {
        pairs.push((from.min(to), from.max(to)));
    }
}

/// Gathers index pairs close enough to collide. Cells whose bounds are
/// further apart than their largest radii plus padding are pruned.
pub(super) fn collect_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    padding: f32,
    pairs: &mut Vec<(usize, usize)>,
) {
    let reach = node_a.max_radius + node_b.max_radius + padding * 2.0;
    if node_a.bounds.gap_sq_to(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[(offset + 1)..] {
                    push_candidate(from, to, positions, radii, padding, pairs);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    push_candidate(from, to, positions, radii, padding, pairs);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (offset, child_a) in children.iter().enumerate() {
            collect_collision_pairs(child_a, child_a, true, positions, radii, padding, pairs);
            for child_b in &children[(offset + 1)..] {
                collect_collision_pairs(child_a, child_b, false, positions, radii, padding, pairs);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            collect_collision_pairs(child, node_b, false, positions, radii, padding, pairs);
        }
    } else {
        for child in node_b.children() {
            collect_collision_pairs(node_a, child, false, positions, radii, padding, pairs);
        }
    }
}

/// Moves overlapping pairs apart in place. A pinned index never moves; its
/// partner takes the whole correction.
pub(super) fn resolve_collisions(
    pairs: &[(usize, usize)],
    positions: &mut [Vec2],
    radii: &[f32],
    pinned: Option<usize>,
    params: CollisionParams,
) -> bool {
    let mut any_moved = false;
    for _ in 0..params.iterations {
        let mut moved = false;
        for &(a, b) in pairs {
            let delta = positions[a] - positions[b];
            let length = delta.length();
            let min_distance = radii[a] + radii[b] + params.padding;
            if length >= min_distance {
                continue;
            }

            let direction = separation_direction(delta, length, a, b);
            let push = direction * ((min_distance - length) * params.strength);
            match (pinned == Some(a), pinned == Some(b)) {
                (true, true) => continue,
                (true, false) => positions[b] -= push,
                (false, true) => positions[a] += push,
                (false, false) => {
                    positions[a] += push * 0.5;
                    positions[b] -= push * 0.5;
                }
            }
            moved = true;
        }

        any_moved |= moved;
        if !moved {
            break;
        }
    }
    any_moved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RepulsionParams {
        RepulsionParams::from_config(&PhysicsConfig::default())
    }

    #[test]
    fn coincident_nodes_repel_without_nan() {
        let positions = vec![Vec2::ZERO, Vec2::ZERO];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_repulsion_exact(&positions, &[0, 0], params(), &mut forces);
        assert!(forces.iter().all(|force| force.x.is_finite() && force.y.is_finite()));
        assert!(forces[0].length() > 0.0);
        assert!((forces[0] + forces[1]).length() < 1e-3);
    }

    #[test]
    fn cross_group_repulsion_is_stronger() {
        let positions = vec![vec2(-20.0, 0.0), vec2(20.0, 0.0)];
        let mut same = vec![Vec2::ZERO; 2];
        let mut cross = vec![Vec2::ZERO; 2];
        accumulate_repulsion_exact(&positions, &[0, 0], params(), &mut same);
        accumulate_repulsion_exact(&positions, &[0, 1], params(), &mut cross);
        assert!(cross[0].length() > same[0].length());
        assert!(same[0].x < 0.0);
    }

    #[test]
    fn barnes_hut_tracks_exact_repulsion() {
        let positions = (0..200)
            .map(|index| {
                let angle = index as f32 * 0.37;
                vec2(angle.cos(), angle.sin()) * (40.0 + index as f32 * 3.0)
            })
            .collect::<Vec<_>>();
        let groups = vec![0; 200];
        let radii = vec![5.0; 200];

        let mut exact = vec![Vec2::ZERO; 200];
        accumulate_repulsion_exact(&positions, &groups, params(), &mut exact);

        let tree = QuadNode::build(&positions, &groups, &radii).unwrap();
        let mut approximate = vec![Vec2::ZERO; 200];
        for (index, force) in approximate.iter_mut().enumerate() {
            accumulate_repulsion_for_node(&tree, index, &positions, &groups, params(), force);
        }

        let error: f32 = exact
            .iter()
            .zip(&approximate)
            .map(|(exact, approximate)| (*exact - *approximate).length())
            .sum();
        let magnitude: f32 = exact.iter().map(|force| force.length()).sum();
        assert!(error / magnitude < 0.25, "relative error {}", error / magnitude);
    }

    #[test]
    fn spring_pulls_stretched_pair_together() {
        let config = PhysicsConfig::default();
        let positions = vec![vec2(0.0, 0.0), vec2(400.0, 0.0)];
        let edges = vec![SimEdge::test_edge(0, 1, 1.0)];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_springs(&edges, &positions, &[0, 0], &config, &mut forces);
        assert!(forces[0].x > 0.0);
        assert!(forces[1].x < 0.0);
    }

    #[test]
    fn spring_weight_is_capped() {
        let config = PhysicsConfig::default();
        let positions = vec![vec2(0.0, 0.0), vec2(400.0, 0.0)];
        let mut capped = vec![Vec2::ZERO; 2];
        let mut huge = vec![Vec2::ZERO; 2];
        let at_cap = config.max_weight_factor;
        accumulate_springs(&[SimEdge::test_edge(0, 1, at_cap)], &positions, &[0, 0], &config, &mut capped);
        accumulate_springs(&[SimEdge::test_edge(0, 1, 100.0)], &positions, &[0, 0], &config, &mut huge);
        assert!((capped[0] - huge[0]).length() < 1e-4);
    }

    #[test]
    fn cohesion_ignores_singleton_groups() {
        let positions = vec![vec2(10.0, 0.0), vec2(-10.0, 0.0), vec2(300.0, 0.0)];
        let mut forces = vec![Vec2::ZERO; 3];
        let (mut centroids, mut counts) = (Vec::new(), Vec::new());
        accumulate_cohesion(&positions, &[0, 0, 1], 0.1, &mut centroids, &mut counts, &mut forces);
        assert!(forces[0].x < 0.0 && forces[1].x > 0.0);
        assert_eq!(forces[2], Vec2::ZERO);
    }

    #[test]
    fn collisions_resolve_and_respect_pin() {
        let mut positions = vec![vec2(0.0, 0.0), vec2(4.0, 0.0)];
        let radii = vec![10.0, 10.0];
        let params = CollisionParams {
            padding: 6.0,
            strength: 1.0,
            iterations: 4,
        };
        assert!(resolve_collisions(&[(0, 1)], &mut positions, &radii, Some(0), params));
        assert_eq!(positions[0], Vec2::ZERO);
        assert!((positions[1].x - 26.0).abs() < 1e-4);
    }

    #[test]
    fn quadtree_finds_all_overlapping_pairs() {
        let positions = (0..60)
            .map(|index| vec2((index % 6) as f32 * 12.0, (index / 6) as f32 * 12.0))
            .collect::<Vec<_>>();
        let radii = vec![5.0; 60];
        let groups = vec![0; 60];
        let tree = QuadNode::build(&positions, &groups, &radii).unwrap();
        let mut pairs = Vec::new();
        collect_collision_pairs(&tree, &tree, true, &positions, &radii, 6.0, &mut pairs);

        for a in 0..60 {
            for b in (a + 1)..60 {
                if (positions[a] - positions[b]).length() < 16.0 {
                    assert!(pairs.contains(&(a, b)), "missing pair {a}-{b}");
                }
            }
        }
    }
}
