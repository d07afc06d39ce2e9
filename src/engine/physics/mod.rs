mod forces;
mod quadtree;

use eframe::egui::Vec2;
use log::warn;

use super::config::PhysicsConfig;
use super::sim::SimGraph;
use forces::{
    CollisionParams, RepulsionParams, accumulate_cohesion, accumulate_gravity,
    accumulate_repulsion_exact, accumulate_repulsion_for_node, accumulate_springs,
    collect_collision_pairs, resolve_collisions,
};
use quadtree::QuadNode;

/// Advances the simulation by one tick. Returns whether any node moved.
pub(super) fn step_physics(graph: &mut SimGraph, config: &PhysicsConfig) -> bool {
    let node_count = graph.nodes.len();
    if node_count == 0 {
        return false;
    }

    let alpha = graph.alpha;
    let pinned = graph.pinned.filter(|&index| index < node_count);

    let scratch = &mut graph.scratch;
    scratch.forces.clear();
    scratch.forces.resize(node_count, Vec2::ZERO);
    scratch.positions.clear();
    scratch.radii.clear();
    scratch.groups.clear();
    for node in &graph.nodes {
        scratch.positions.push(node.position);
        scratch.radii.push(node.radius);
        scratch.groups.push(node.group);
    }

    let positions = &scratch.positions;
    let groups = &scratch.groups;
    let forces = &mut scratch.forces;
    let repulsion = RepulsionParams::from_config(config);

    let quadtree = if node_count > config.barnes_hut_threshold || config.collision_iterations > 0 {
        QuadNode::build(positions, groups, &scratch.radii)
    } else {
        None
    };

    match &quadtree {
        Some(tree) if node_count > config.barnes_hut_threshold => {
            for (index, force) in forces.iter_mut().enumerate() {
                accumulate_repulsion_for_node(tree, index, positions, groups, repulsion, force);
            }
        }
        _ => accumulate_repulsion_exact(positions, groups, repulsion, forces),
    }
    accumulate_springs(&graph.edges, positions, groups, config, forces);
    accumulate_cohesion(
        positions,
        groups,
        config.cluster_cohesion,
        &mut scratch.centroids,
        &mut scratch.counts,
        forces,
    );
    accumulate_gravity(positions, config.gravity, forces);

    let max_speed_sq = config.max_speed * config.max_speed;
    let mut any_motion = false;
    let mut reset = 0usize;
    for (index, node) in graph.nodes.iter_mut().enumerate() {
        if Some(index) == pinned {
            continue;
        }

        let mut velocity = (node.velocity + forces[index] * alpha) * config.friction;
        let speed_sq = velocity.length_sq();
        if speed_sq > max_speed_sq {
            velocity *= config.max_speed / speed_sq.sqrt();
        }

        let position = node.position + velocity;
        if !(position.x.is_finite() && position.y.is_finite() && velocity.x.is_finite() && velocity.y.is_finite()) {
            node.position = node.seed;
            node.velocity = Vec2::ZERO;
            reset += 1;
            continue;
        }

        node.velocity = velocity;
        node.position = position;
        any_motion |= velocity.length_sq() > 0.000_001;
    }
    if reset > 0 {
        warn!("reset {reset} nodes with non-finite motion to their seed positions");
    }

    if let Some(tree) = &quadtree {
        scratch.positions.clear();
        scratch.positions.extend(graph.nodes.iter().map(|node| node.position));
        scratch.pairs.clear();
        collect_collision_pairs(
            tree,
            tree,
            true,
            &scratch.positions,
            &scratch.radii,
            config.collision_padding,
            &mut scratch.pairs,
        );
        let moved = resolve_collisions(
            &scratch.pairs,
            &mut scratch.positions,
            &scratch.radii,
            pinned,
            CollisionParams {
                padding: config.collision_padding,
                strength: config.collision_strength,
                iterations: config.collision_iterations,
            },
        );
        if moved {
            for (node, position) in graph.nodes.iter_mut().zip(&scratch.positions) {
                node.position = *position;
            }
            any_motion = true;
        }
    }

    graph.alpha = config.alpha_floor + (graph.alpha - config.alpha_floor) * config.alpha_decay;
    graph.ticks += 1;
    any_motion
}
