use eframe::egui::{Pos2, Vec2};
use log::debug;

use super::GraphEngine;
use super::callbacks::GraphCallbacks;

/// Pointer gesture currently in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering(usize),
    Dragging {
        node: usize,
        grab_offset: Vec2,
    },
    Panning {
        origin: Pos2,
        pan_at_start: Vec2,
    },
}

impl InteractionState {
    pub fn hovered(self) -> Option<usize> {
        match self {
            Self::Hovering(index) => Some(index),
            _ => None,
        }
    }

    pub fn dragged(self) -> Option<usize> {
        match self {
            Self::Dragging { node, .. } => Some(node),
            _ => None,
        }
    }

    /// Node under the pointer as the collaborator sees it. A drag keeps its
    /// node, so pressing on a hovered node does not report a hover change.
    fn pointer_subject(self) -> Option<usize> {
        match self {
            Self::Hovering(index) | Self::Dragging { node: index, .. } => Some(index),
            _ => None,
        }
    }

    fn is_gesture(self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Panning { .. })
    }
}

/// What happened at pointer-down, kept until pointer-up to tell a click
/// from a drag.
#[derive(Clone, Copy, Debug)]
pub(super) struct PressRecord {
    node: Option<usize>,
    modifier: bool,
    last: Pos2,
    travel: f32,
}

impl PressRecord {
    fn advance(&mut self, pos: Pos2) {
        self.travel += self.last.distance(pos);
        self.last = pos;
    }
}

impl GraphEngine {
    /// Topmost node under a screen position. Under isolation only the focal
    /// node and its neighbors are candidates.
    pub fn hit_test(&self, pos: Pos2) -> Option<usize> {
        self.graph
            .draw_order()
            .iter()
            .rev()
            .copied()
            .filter(|&index| self.isolation.is_visible(index))
            .find(|&index| {
                let center = self
                    .camera
                    .to_screen(self.surface, self.graph.nodes()[index].position);
                center.distance(pos) <= self.screen_radius(index)
            })
    }

    fn set_state(&mut self, state: InteractionState, callbacks: &mut dyn GraphCallbacks) {
        let before = self.state.pointer_subject();
        self.state = state;
        let after = state.pointer_subject();
        if before != after {
            callbacks.on_hover_node(after.and_then(|index| self.graph.node(index)).map(|sim| &sim.node));
        }
    }

    fn hover_at(&mut self, pos: Pos2, callbacks: &mut dyn GraphCallbacks) {
        let state = match self.hit_test(pos) {
            Some(index) => InteractionState::Hovering(index),
            None => InteractionState::Idle,
        };
        self.set_state(state, callbacks);
    }

    fn release_drag(&mut self, reheat: bool) {
        if let InteractionState::Dragging { node, .. } = self.state {
            if let Some(sim) = self.graph.nodes.get_mut(node) {
                sim.velocity = Vec2::ZERO;
            }
            self.graph.pin(None);
            if reheat {
                self.graph.reheat(self.config.physics.reheat_alpha);
            }
        }
    }

    /// Starts a drag on a node or a pan on empty space. Ignored while a
    /// gesture is already active.
    pub fn pointer_down(&mut self, pos: Pos2, modifier: bool, callbacks: &mut dyn GraphCallbacks) {
        if self.press.is_some() || self.state.is_gesture() {
            return;
        }

        callbacks.on_graph_interact();
        let hit = self.hit_test(pos);
        self.press = Some(PressRecord {
            node: hit,
            modifier,
            last: pos,
            travel: 0.0,
        });

        let state = match hit {
            Some(node) => {
                let world = self.camera.to_world(self.surface, pos);
                let grab_offset = self.graph.nodes[node].position - world;
                self.graph.nodes[node].velocity = Vec2::ZERO;
                self.graph.pin(Some(node));
                InteractionState::Dragging { node, grab_offset }
            }
            None => InteractionState::Panning {
                origin: pos,
                pan_at_start: self.camera.pan,
            },
        };
        self.set_state(state, callbacks);
    }

    pub fn pointer_move(&mut self, pos: Pos2, callbacks: &mut dyn GraphCallbacks) {
        if let Some(press) = &mut self.press {
            press.advance(pos);
        }

        match self.state {
            InteractionState::Dragging { node, grab_offset } => {
                let world = self.camera.to_world(self.surface, pos) + grab_offset;
                self.graph.place(node, world);
            }
            InteractionState::Panning {
                origin,
                pan_at_start,
            } => self.camera.pan_from(pan_at_start, pos - origin),
            InteractionState::Idle | InteractionState::Hovering(_) => self.hover_at(pos, callbacks),
        }
    }

    /// Ends the gesture. Short travel over a node is a click (or an
    /// isolation toggle with the modifier); anything longer is a drag.
    pub fn pointer_up(&mut self, pos: Pos2, callbacks: &mut dyn GraphCallbacks) {
        let Some(mut press) = self.press.take() else {
            self.hover_at(pos, callbacks);
            return;
        };
        press.advance(pos);

        let is_click = press.travel < self.config.interaction.click_travel_threshold;
        if let InteractionState::Dragging { node, grab_offset } = self.state
            && !is_click
        {
            let world = self.camera.to_world(self.surface, pos) + grab_offset;
            self.graph.place(node, world);
        }
        self.release_drag(!is_click);

        if is_click && let Some(index) = press.node {
            self.click(index, press.modifier, callbacks);
        }
        self.hover_at(pos, callbacks);
    }

    fn click(&mut self, index: usize, modifier: bool, callbacks: &mut dyn GraphCallbacks) {
        let Some(id) = self.graph.node(index).map(|sim| sim.node.id.clone()) else {
            return;
        };

        if modifier {
            self.isolation.toggle(&self.graph, &id);
            callbacks.on_node_isolate_toggle(&self.graph.nodes[index].node);
        } else if self.profile.is_clickable(&self.graph.nodes[index].node) {
            callbacks.on_node_click(&self.graph.nodes[index].node);
        } else {
            debug!("click on non-clickable node `{id}`");
        }
    }

    /// Cancels any gesture without a click and clears hover.
    pub fn pointer_leave(&mut self, callbacks: &mut dyn GraphCallbacks) {
        self.release_drag(true);
        self.press = None;
        self.set_state(InteractionState::Idle, callbacks);
    }

    /// One wheel step anchored at `pos` when known. Positive `delta_y` zooms out.
    pub fn wheel(&mut self, pos: Option<Pos2>, delta_y: f32) {
        let anchor = pos.map(|pos| (self.surface, pos));
        self.camera.wheel(delta_y, anchor, &self.config.camera);

        // Restart an active pan from the zoomed camera so the next move
        // keeps the anchored world point.
        if let InteractionState::Panning { origin, .. } = self.state {
            let origin = self.press.map_or(origin, |press| press.last);
            self.state = InteractionState::Panning {
                origin,
                pan_at_start: self.camera.pan,
            };
        }
    }
}
