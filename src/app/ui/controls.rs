use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, Ui};

use crate::engine::PhysicsConfig;

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHold {
    secs: f32,
    direction: i8,
}

/// Arrow keys nudge a focused slider, speeding up the longer they are held.
fn apply_arrow_acceleration(ui: &Ui, response: &Response, value: &mut f32, range: RangeInclusive<f32>) -> bool {
    let state_id = response.id.with("arrow_key_hold");
    if !response.has_focus() {
        ui.ctx().data_mut(|data| data.remove::<SliderKeyHold>(state_id));
        return false;
    }

    let (delta_time, direction) = ui.input(|input| {
        let up = input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp);
        let down = input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown);
        (input.stable_dt.min(0.1), (up as i8) - (down as i8))
    });

    let mut hold = ui
        .ctx()
        .data(|data| data.get_temp::<SliderKeyHold>(state_id).unwrap_or_default());
    if direction == 0 || direction != hold.direction {
        hold = SliderKeyHold { secs: 0.0, direction };
    }
    hold.secs += delta_time;
    ui.ctx().data_mut(|data| data.insert_temp(state_id, hold));
    if direction == 0 {
        return false;
    }

    let (min, max) = (*range.start(), *range.end());
    let ramp = hold.secs * SLIDER_KEY_ACCEL_PER_SEC;
    let speed = SLIDER_KEY_BASE_RATE * (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX);
    let step = ((max - min) / 200.0).max(0.0005);

    let old_value = *value;
    *value = (*value + direction as f32 * step * speed * delta_time).clamp(min, max);
    ui.ctx().request_repaint();
    (*value - old_value).abs() > f32::EPSILON
}

fn physics_slider(ui: &mut Ui, value: &mut f32, range: RangeInclusive<f32>, text: &str, hint: &str) -> bool {
    let response = ui
        .add(
            egui::Slider::new(&mut *value, range.clone())
                .text(text)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hint);
    if response.hovered() {
        response.request_focus();
    }
    response.changed() | apply_arrow_acceleration(ui, &response, value, range)
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (label or id)")
            .on_hover_text("Fuzzy-highlight matching nodes and dim the rest.");
        let search_response = ui.text_edit_singleline(&mut self.search);
        if search_response.changed() {
            self.view.engine_mut().set_search(&self.search);
        }
        if !self.search.trim().is_empty() {
            ui.small(format!(
                "{} matching nodes",
                self.view.engine().search_match_count()
            ));
        }

        ui.separator();

        let mut live_physics = self.view.live_physics();
        if ui
            .checkbox(&mut live_physics, "Live physics simulation")
            .on_hover_text("Advance the layout every frame.")
            .changed()
        {
            self.view.set_live_physics(live_physics);
        }

        let mut config = *self.view.engine().config();
        let mut config_changed = ui
            .checkbox(&mut config.render.show_labels, "Show labels")
            .on_hover_text("Label nodes once zoomed in or large enough on screen.")
            .changed();

        if ui
            .button("Reheat layout")
            .on_hover_text("Wake the simulation so the layout settles again.")
            .clicked()
        {
            self.view.engine_mut().reheat();
        }

        ui.collapsing("Physics tuning", |ui| {
            config_changed |= Self::draw_physics_tuning(ui, &mut config.physics);
            if ui.button("Restore defaults").clicked() {
                config.physics = PhysicsConfig::default();
                config_changed = true;
            }
        });

        if config_changed {
            let engine = self.view.engine_mut();
            engine.set_config(config);
            engine.reheat();
        }

        ui.separator();
        let alpha = self.view.engine().graph().alpha();
        ui.small(format!("cooling alpha {alpha:.3}"));
    }

    fn draw_physics_tuning(ui: &mut Ui, physics: &mut PhysicsConfig) -> bool {
        let mut changed = false;
        changed |= physics_slider(
            ui,
            &mut physics.repulsion_same_group,
            0.0..=6_000.0,
            "Repulsion (same group)",
            "How strongly nodes of one cluster push apart.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.repulsion_cross_group,
            0.0..=20_000.0,
            "Repulsion (cross group)",
            "How strongly different clusters push apart.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.rest_length_same_group,
            20.0..=300.0,
            "Edge length (same group)",
            "Rest length of springs inside a cluster.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.rest_length_cross_group,
            20.0..=500.0,
            "Edge length (cross group)",
            "Rest length of springs between clusters.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.spring_stiffness,
            0.0..=0.5,
            "Edge stiffness",
            "Spring strength per unit of edge weight.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.cluster_cohesion,
            0.0..=0.1,
            "Cluster cohesion",
            "Pull toward the centroid of each node's group.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.gravity,
            0.0..=0.05,
            "Gravity",
            "Pull toward the world origin.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.friction,
            0.1..=0.95,
            "Friction",
            "Fraction of velocity kept each tick.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.collision_padding,
            0.0..=30.0,
            "Collision padding",
            "Minimum gap kept between node boundaries.",
        );
        changed
    }
}
