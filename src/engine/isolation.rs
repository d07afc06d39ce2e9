use std::collections::HashSet;

use log::debug;

use super::sim::SimGraph;

/// Spotlight on one node and its direct neighbors.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Isolation {
    #[default]
    None,
    Focused {
        focal: usize,
        focal_id: String,
        neighbors: HashSet<usize>,
    },
}

impl Isolation {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Focused { .. })
    }

    pub fn focal(&self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Focused { focal, .. } => Some(*focal),
        }
    }

    pub fn focal_id(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Focused { focal_id, .. } => Some(focal_id),
        }
    }

    pub fn neighbors(&self) -> Option<&HashSet<usize>> {
        match self {
            Self::None => None,
            Self::Focused { neighbors, .. } => Some(neighbors),
        }
    }

    /// True when the node is drawn at full strength: always without
    /// isolation, otherwise only the focal node and its neighbors.
    pub fn is_visible(&self, index: usize) -> bool {
        match self {
            Self::None => true,
            Self::Focused {
                focal, neighbors, ..
            } => *focal == index || neighbors.contains(&index),
        }
    }

    /// Focuses `id`, or clears isolation when `id` is already focal.
    pub(super) fn toggle(&mut self, graph: &SimGraph, id: &str) {
        if self.focal_id() == Some(id) {
            self.clear();
        } else {
            self.set(graph, id);
        }
    }

    /// Focuses `id`. Unknown ids clear isolation; the current focal id is kept as is.
    pub(super) fn set(&mut self, graph: &SimGraph, id: &str) {
        if self.focal_id() == Some(id) {
            return;
        }

        let Some(focal) = graph.index_of(id) else {
            debug!("isolation target `{id}` is not in the graph");
            self.clear();
            return;
        };
        *self = Self::Focused {
            focal,
            focal_id: id.to_string(),
            neighbors: graph.neighbors(focal),
        };
        debug!("isolating `{id}`");
    }

    pub(super) fn clear(&mut self) {
        if self.is_active() {
            debug!("isolation cleared");
        }
        *self = Self::None;
    }

    /// Re-derives the neighbor set after the edge list changed.
    pub(super) fn recompute(&mut self, graph: &SimGraph) {
        let Some(focal_id) = self.focal_id().map(str::to_string) else {
            return;
        };

        match graph.index_of(&focal_id) {
            Some(focal) => {
                *self = Self::Focused {
                    focal,
                    focal_id,
                    neighbors: graph.neighbors(focal),
                }
            }
            None => self.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::PhysicsConfig;
    use crate::engine::profile::KindProfile;
    use crate::model::{Edge, GraphData, Node, NodeKind};

    fn graph() -> SimGraph {
        let data = GraphData::new(
            vec![
                Node::new("a", NodeKind::File, "g"),
                Node::new("b", NodeKind::File, "g"),
                Node::new("c", NodeKind::File, "g"),
                Node::new("d", NodeKind::File, "h"),
            ],
            vec![Edge::new("a", "b"), Edge::new("c", "a"), Edge::new("c", "d")],
        );
        SimGraph::build(&data, &KindProfile::default(), &PhysicsConfig::default())
    }

    #[test]
    fn toggling_twice_clears() {
        let graph = graph();
        let mut isolation = Isolation::default();
        isolation.toggle(&graph, "a");
        assert_eq!(isolation.focal(), Some(0));
        assert_eq!(isolation.neighbors(), Some(&HashSet::from([1, 2])));
        isolation.toggle(&graph, "a");
        assert!(!isolation.is_active());
    }

    #[test]
    fn toggling_another_node_switches_focus() {
        let graph = graph();
        let mut isolation = Isolation::default();
        isolation.toggle(&graph, "a");
        isolation.toggle(&graph, "d");
        assert_eq!(isolation.focal_id(), Some("d"));
        assert_eq!(isolation.neighbors(), Some(&HashSet::from([2])));
        assert!(isolation.is_visible(2));
        assert!(!isolation.is_visible(0));
    }

    #[test]
    fn set_is_idempotent() {
        let graph = graph();
        let mut isolation = Isolation::default();
        isolation.set(&graph, "b");
        isolation.set(&graph, "b");
        assert_eq!(isolation.focal_id(), Some("b"));
    }

    #[test]
    fn unknown_focal_clears() {
        let graph = graph();
        let mut isolation = Isolation::default();
        isolation.set(&graph, "a");
        isolation.set(&graph, "missing");
        assert_eq!(isolation, Isolation::None);
    }
}
