use std::collections::VecDeque;

use eframe::egui::{Pos2, Rect};
use log::info;

use super::GraphEngine;
use super::callbacks::GraphCallbacks;
use super::scene::Scene;
use super::text::TextMeasure;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { pos: Pos2, modifier: bool },
    Move { pos: Pos2 },
    Up { pos: Pos2 },
    Leave,
    Wheel { pos: Option<Pos2>, delta_y: f32 },
    ClearIsolation,
}

/// Running frame loop around one engine. Stopping (or dropping) the view
/// drops queued input and turns every later frame into an empty scene.
pub struct GraphView {
    engine: GraphEngine,
    pending: VecDeque<PointerEvent>,
    running: bool,
    live_physics: bool,
}

impl GraphView {
    pub fn start(engine: GraphEngine) -> Self {
        info!("graph view started with {} nodes", engine.graph().len());
        Self {
            engine,
            pending: VecDeque::new(),
            running: true,
            live_physics: true,
        }
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.pending.clear();
        info!("graph view stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn push_event(&mut self, event: PointerEvent) {
        if self.running {
            self.pending.push_back(event);
        }
    }

    pub fn live_physics(&self) -> bool {
        self.live_physics
    }

    pub fn set_live_physics(&mut self, live: bool) {
        self.live_physics = live;
    }

    pub fn engine(&self) -> &GraphEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GraphEngine {
        &mut self.engine
    }

    /// Applies queued input, runs one tick and renders.
    pub fn frame(
        &mut self,
        surface: Rect,
        callbacks: &mut dyn GraphCallbacks,
        measure: &dyn TextMeasure,
    ) -> Scene {
        if !self.running {
            return Scene::default();
        }

        self.engine.set_surface(surface);
        while let Some(event) = self.pending.pop_front() {
            match event {
                PointerEvent::Down { pos, modifier } => self.engine.pointer_down(pos, modifier, callbacks),
                PointerEvent::Move { pos } => self.engine.pointer_move(pos, callbacks),
                PointerEvent::Up { pos } => self.engine.pointer_up(pos, callbacks),
                PointerEvent::Leave => self.engine.pointer_leave(callbacks),
                PointerEvent::Wheel { pos, delta_y } => self.engine.wheel(pos, delta_y),
                PointerEvent::ClearIsolation => self.engine.clear_isolation(),
            }
        }

        if self.live_physics {
            self.engine.tick();
        }
        self.engine.render(measure)
    }
}

impl Drop for GraphView {
    fn drop(&mut self) {
        self.stop();
    }
}
