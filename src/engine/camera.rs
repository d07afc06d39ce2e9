use eframe::egui::{Pos2, Rect, Vec2};

use super::config::CameraConfig;

/// Pan/zoom state mapping world space onto a rendering surface.
///
/// `screen = surface.center() + (world + pan) * zoom`, so `pan` is expressed
/// in world units and the world origin sits at the surface center when
/// `pan` is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn to_screen(&self, surface: Rect, world: Vec2) -> Pos2 {
        surface.center() + (world + self.pan) * self.zoom
    }

    pub fn to_world(&self, surface: Rect, screen: Pos2) -> Vec2 {
        (screen - surface.center()) / self.zoom - self.pan
    }

    pub fn set_zoom(&mut self, zoom: f32, config: &CameraConfig) {
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        self.zoom = zoom.clamp(config.min_zoom, config.max_zoom);
    }

    /// Multiplies the zoom by `factor`; with an anchor the world point under
    /// the anchor stays put.
    pub fn zoom_by(&mut self, factor: f32, anchor: Option<(Rect, Pos2)>, config: &CameraConfig) {
        let world_before = anchor.map(|(surface, pointer)| self.to_world(surface, pointer));
        self.set_zoom(self.zoom * factor, config);

        if let (Some((surface, pointer)), Some(world_before)) = (anchor, world_before) {
            self.pan = (pointer - surface.center()) / self.zoom - world_before;
        }
    }

    /// Applies one wheel notch. Positive `delta_y` zooms out, negative zooms in.
    pub fn wheel(&mut self, delta_y: f32, anchor: Option<(Rect, Pos2)>, config: &CameraConfig) {
        if delta_y.abs() <= f32::EPSILON || !delta_y.is_finite() {
            return;
        }

        let factor = if delta_y > 0.0 {
            config.zoom_out_step
        } else {
            config.zoom_in_step
        };
        self.zoom_by(factor, anchor, config);
    }

    pub fn pan_from(&mut self, pan_at_start: Vec2, screen_delta: Vec2) {
        let pan = pan_at_start + screen_delta / self.zoom;
        if pan.x.is_finite() && pan.y.is_finite() {
            self.pan = pan;
        }
    }

    pub fn center_on(&mut self, world: Vec2) {
        if world.x.is_finite() && world.y.is_finite() {
            self.pan = -world;
        }
    }

    pub fn fit_bounds(&mut self, surface: Rect, bounds: Rect, config: &CameraConfig) {
        if !bounds.is_finite() || surface.width() <= 0.0 || surface.height() <= 0.0 {
            return;
        }

        let available_width = (surface.width() - config.fit_padding * 2.0).max(1.0);
        let available_height = (surface.height() - config.fit_padding * 2.0).max(1.0);
        let width = bounds.width().max(1.0);
        let height = bounds.height().max(1.0);
        let zoom = (available_width / width).min(available_height / height);

        self.set_zoom(zoom, config);
        self.center_on(bounds.center().to_vec2());
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn surface() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    #[test]
    fn world_origin_maps_to_surface_center() {
        let camera = Camera::default();
        assert_eq!(camera.to_screen(surface(), Vec2::ZERO), pos2(400.0, 300.0));
    }

    #[test]
    fn zoom_out_step_from_one() {
        let config = CameraConfig::default();
        let mut camera = Camera::default();
        camera.wheel(120.0, None, &config);
        assert!((camera.zoom - 0.9).abs() < 1e-6);
    }

    #[test]
    fn anchored_zoom_keeps_world_point_under_pointer() {
        let config = CameraConfig::default();
        let mut camera = Camera {
            pan: vec2(35.0, -12.0),
            zoom: 1.3,
        };
        let pointer = pos2(610.0, 140.0);
        let before = camera.to_world(surface(), pointer);
        camera.wheel(-1.0, Some((surface(), pointer)), &config);
        let after = camera.to_world(surface(), pointer);
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn pan_divides_screen_delta_by_zoom() {
        let mut camera = Camera {
            pan: vec2(10.0, 10.0),
            zoom: 2.0,
        };
        camera.pan_from(vec2(10.0, 10.0), vec2(40.0, -20.0));
        assert_eq!(camera.pan, vec2(30.0, 0.0));
    }

    #[test]
    fn fit_bounds_centers_and_clamps() {
        let config = CameraConfig::default();
        let mut camera = Camera::default();
        let bounds = Rect::from_min_max(pos2(100.0, 100.0), pos2(300.0, 200.0));
        camera.fit_bounds(surface(), bounds, &config);
        assert!(camera.zoom <= config.max_zoom);
        let center = camera.to_screen(surface(), vec2(200.0, 150.0));
        assert!((center - surface().center()).length() < 1e-3);

        let tiny = Rect::from_min_max(pos2(0.0, 0.0), pos2(0.5, 0.5));
        camera.fit_bounds(surface(), tiny, &config);
        assert_eq!(camera.zoom, config.max_zoom);
    }
}
