use eframe::egui::{Event, Key, PointerButton, Rect, Sense, Ui};

use crate::engine::{GraphEvent, PointerEvent};

use super::ViewModel;
use super::render_utils::{PainterMeasure, draw_background, paint_scene, world_origin_on_screen};

impl ViewModel {
    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if self.fit_pending && rect.is_positive() {
            let engine = self.view.engine_mut();
            engine.set_surface(rect);
            engine.fit_to_graph();
            self.fit_pending = false;
        }

        let camera = *self.view.engine().camera();
        draw_background(
            &painter,
            rect,
            world_origin_on_screen(rect, camera.pan, camera.zoom),
            camera.zoom,
        );

        self.queue_pointer_events(ui, rect);

        let mut events: Vec<GraphEvent> = Vec::new();
        let measure = PainterMeasure { painter: &painter };
        let scene = self.view.frame(rect, &mut events, &measure);
        paint_scene(&painter, &scene);

        self.apply_graph_events(events);
        ui.ctx().request_repaint();
    }

    fn queue_pointer_events(&mut self, ui: &Ui, rect: Rect) {
        let typing = ui.ctx().wants_keyboard_input();
        let (events, hover_pos) = ui.input(|input| (input.events.clone(), input.pointer.hover_pos()));

        for event in events {
            match event {
                Event::PointerMoved(pos) => {
                    let inside = rect.contains(pos);
                    if inside || self.pointer.pressed {
                        self.view.push_event(PointerEvent::Move { pos });
                    } else if self.pointer.inside {
                        self.view.push_event(PointerEvent::Leave);
                    }
                    self.pointer.inside = inside;
                }
                Event::PointerButton {
                    pos,
                    button,
                    pressed: true,
                    modifiers,
                } => {
                    let usable = matches!(button, PointerButton::Primary | PointerButton::Secondary);
                    if usable && rect.contains(pos) && !self.pointer.pressed {
                        self.pointer.pressed = true;
                        self.view.push_event(PointerEvent::Down {
                            pos,
                            modifier: modifiers.alt || button == PointerButton::Secondary,
                        });
                    }
                }
                Event::PointerButton {
                    pos, pressed: false, ..
                } => {
                    if self.pointer.pressed {
                        self.pointer.pressed = false;
                        self.view.push_event(PointerEvent::Up { pos });
                    }
                }
                Event::PointerGone => {
                    if self.pointer.inside || self.pointer.pressed {
                        self.view.push_event(PointerEvent::Leave);
                    }
                    self.pointer = Default::default();
                }
                Event::MouseWheel { delta, .. } => {
                    if self.pointer.inside && delta.y.abs() > f32::EPSILON {
                        self.view.push_event(PointerEvent::Wheel {
                            pos: hover_pos,
                            delta_y: -delta.y,
                        });
                    }
                }
                Event::Key {
                    key: Key::Escape,
                    pressed: true,
                    ..
                } if !typing => {
                    self.view.push_event(PointerEvent::ClearIsolation);
                }
                _ => {}
            }
        }
    }

    fn apply_graph_events(&mut self, events: Vec<GraphEvent>) {
        for event in events {
            match event {
                GraphEvent::NodeClicked(id) => {
                    self.last_click = Some(id.clone());
                    self.set_selected(Some(id));
                }
                GraphEvent::IsolateToggled(id) => {
                    self.set_selected(Some(id));
                }
                GraphEvent::HoverChanged(id) => self.hovered = id,
                GraphEvent::Interacted => {}
            }
        }
    }
}
