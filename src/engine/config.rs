use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub alpha_max: f32,
    pub alpha_floor: f32,
    pub alpha_decay: f32,
    pub reheat_alpha: f32,
    pub repulsion_same_group: f32,
    pub repulsion_cross_group: f32,
    pub min_distance: f32,
    pub rest_length_same_group: f32,
    pub rest_length_cross_group: f32,
    pub spring_stiffness: f32,
    pub max_weight_factor: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub collision_iterations: usize,
    pub cluster_cohesion: f32,
    pub gravity: f32,
    pub friction: f32,
    pub max_speed: f32,
    pub barnes_hut_threshold: usize,
    pub barnes_hut_theta: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            alpha_max: 1.0,
            alpha_floor: 0.04,
            alpha_decay: 0.985,
            reheat_alpha: 0.3,
            repulsion_same_group: 1_500.0,
            repulsion_cross_group: 6_000.0,
            min_distance: 1.0,
            rest_length_same_group: 90.0,
            rest_length_cross_group: 170.0,
            spring_stiffness: 0.08,
            max_weight_factor: 3.0,
            collision_padding: 6.0,
            collision_strength: 1.0,
            collision_iterations: 4,
            cluster_cohesion: 0.01,
            gravity: 0.002,
            friction: 0.6,
            max_speed: 40.0,
            barnes_hut_threshold: 400,
            barnes_hut_theta: 0.72,
        }
    }
}

impl PhysicsConfig {
    pub fn sanitized(self) -> Self {
        let alpha_floor = self.alpha_floor.clamp(0.0001, 1.0);
        Self {
            alpha_max: self.alpha_max.max(alpha_floor),
            alpha_floor,
            alpha_decay: self.alpha_decay.clamp(0.0, 0.9999),
            reheat_alpha: self.reheat_alpha.clamp(alpha_floor, self.alpha_max.max(alpha_floor)),
            repulsion_same_group: self.repulsion_same_group.max(0.0),
            repulsion_cross_group: self.repulsion_cross_group.max(0.0),
            min_distance: self.min_distance.max(0.01),
            rest_length_same_group: self.rest_length_same_group.max(1.0),
            rest_length_cross_group: self.rest_length_cross_group.max(1.0),
            spring_stiffness: self.spring_stiffness.clamp(0.0, 0.5),
            max_weight_factor: self.max_weight_factor.max(1.0),
            collision_padding: self.collision_padding.max(0.0),
            collision_strength: self.collision_strength.clamp(0.0, 1.0),
            collision_iterations: self.collision_iterations.min(32),
            cluster_cohesion: self.cluster_cohesion.clamp(0.0, 0.5),
            gravity: self.gravity.clamp(0.0, 0.5),
            friction: self.friction.clamp(0.0, 0.99),
            max_speed: self.max_speed.max(0.1),
            barnes_hut_threshold: self.barnes_hut_threshold,
            barnes_hut_theta: self.barnes_hut_theta.clamp(0.1, 1.5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_out_step: f32,
    pub zoom_in_step: f32,
    pub fit_padding: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.2,
            max_zoom: 5.0,
            zoom_out_step: 0.9,
            zoom_in_step: 1.1,
            fit_padding: 48.0,
        }
    }
}

impl CameraConfig {
    pub fn sanitized(self) -> Self {
        let min_zoom = self.min_zoom.max(0.001);
        Self {
            min_zoom,
            max_zoom: self.max_zoom.max(min_zoom),
            zoom_out_step: self.zoom_out_step.clamp(0.01, 1.0),
            zoom_in_step: self.zoom_in_step.max(1.0),
            fit_padding: self.fit_padding.max(0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Total pointer travel, in screen pixels, below which a press counts as a click.
    pub click_travel_threshold: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_travel_threshold: 6.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub radius_zoom_exponent: f32,
    pub min_screen_radius: f32,
    pub max_screen_radius: f32,
    pub dimmed_alpha: f32,
    pub search_dimmed_alpha: f32,
    pub edge_base_width: f32,
    pub arrow_size: f32,
    pub label_font_size: f32,
    pub label_max_chars: usize,
    pub label_padding_x: f32,
    pub label_padding_y: f32,
    pub label_gap: f32,
    pub label_min_zoom: f32,
    pub label_min_radius: f32,
    pub show_labels: bool,
    pub tooltip_min_width: f32,
    pub tooltip_max_width: f32,
    pub tooltip_gap: f32,
    pub tooltip_padding: f32,
    pub tooltip_title_size: f32,
    pub tooltip_text_size: f32,
    pub tooltip_line_height: f32,
    pub tooltip_line_chars: usize,
    pub tooltip_max_lines: usize,
    pub tooltip_max_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            radius_zoom_exponent: 0.5,
            min_screen_radius: 2.5,
            max_screen_radius: 64.0,
            dimmed_alpha: 0.08,
            search_dimmed_alpha: 0.35,
            edge_base_width: 1.2,
            arrow_size: 7.0,
            label_font_size: 11.0,
            label_max_chars: 24,
            label_padding_x: 6.0,
            label_padding_y: 3.0,
            label_gap: 4.0,
            label_min_zoom: 1.2,
            label_min_radius: 14.0,
            show_labels: true,
            tooltip_min_width: 140.0,
            tooltip_max_width: 300.0,
            tooltip_gap: 10.0,
            tooltip_padding: 8.0,
            tooltip_title_size: 13.0,
            tooltip_text_size: 11.0,
            tooltip_line_height: 15.0,
            tooltip_line_chars: 42,
            tooltip_max_lines: 4,
            tooltip_max_chars: 280,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub interaction: InteractionConfig,
    pub render: RenderConfig,
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid engine config {}", path.display()))?;
        Ok(config.sanitized())
    }

    pub fn sanitized(self) -> Self {
        Self {
            physics: self.physics.sanitized(),
            camera: self.camera.sanitized(),
            interaction: InteractionConfig {
                click_travel_threshold: self.interaction.click_travel_threshold.max(0.0),
            },
            render: self.render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"physics": {"friction": 0.5}, "camera": {"max_zoom": 3.0}}"#)
                .unwrap();
        assert_eq!(config.physics.friction, 0.5);
        assert_eq!(config.physics.alpha_max, PhysicsConfig::default().alpha_max);
        assert_eq!(config.camera.max_zoom, 3.0);
        assert_eq!(config.camera.min_zoom, 0.2);
        assert_eq!(config.interaction.click_travel_threshold, 6.0);
    }

    #[test]
    fn sanitized_repairs_inverted_zoom_range() {
        let camera = CameraConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
            ..CameraConfig::default()
        }
        .sanitized();
        assert!(camera.max_zoom >= camera.min_zoom);
    }

    #[test]
    fn sanitized_keeps_friction_below_one() {
        let physics = PhysicsConfig {
            friction: 1.4,
            ..PhysicsConfig::default()
        }
        .sanitized();
        assert!(physics.friction < 1.0);
    }

    #[test]
    fn from_json_file_reads_and_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"interaction": {"click_travel_threshold": -3}}"#).unwrap();
        let config = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.interaction.click_travel_threshold, 0.0);
    }
}
