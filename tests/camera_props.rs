use eframe::egui::{Rect, pos2, vec2};
use graph_lens::engine::{Camera, CameraConfig};
use proptest::prelude::*;

fn surface() -> Rect {
    Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
}

proptest! {
    #[test]
    fn screen_world_screen_is_identity(
        pan_x in -2_000.0f32..2_000.0,
        pan_y in -2_000.0f32..2_000.0,
        zoom in 0.2f32..5.0,
        x in 0.0f32..800.0,
        y in 0.0f32..600.0,
    ) {
        let camera = Camera { pan: vec2(pan_x, pan_y), zoom };
        let screen = pos2(x, y);
        let back = camera.to_screen(surface(), camera.to_world(surface(), screen));
        prop_assert!((back - screen).length() < 1e-2, "{screen:?} -> {back:?}");
    }

    #[test]
    fn world_screen_world_is_identity(
        pan_x in -2_000.0f32..2_000.0,
        pan_y in -2_000.0f32..2_000.0,
        zoom in 0.2f32..5.0,
        x in -5_000.0f32..5_000.0,
        y in -5_000.0f32..5_000.0,
    ) {
        let camera = Camera { pan: vec2(pan_x, pan_y), zoom };
        let world = vec2(x, y);
        let back = camera.to_world(surface(), camera.to_screen(surface(), world));
        prop_assert!((back - world).length() < 1e-2, "{world:?} -> {back:?}");
    }

    #[test]
    fn wheel_never_leaves_zoom_range(
        steps in prop::collection::vec(any::<bool>(), 0..200),
        anchor_x in 0.0f32..800.0,
        anchor_y in 0.0f32..600.0,
    ) {
        let config = CameraConfig::default();
        let mut camera = Camera::default();
        for zoom_out in steps {
            let delta = if zoom_out { 1.0 } else { -1.0 };
            camera.wheel(delta, Some((surface(), pos2(anchor_x, anchor_y))), &config);
            prop_assert!(camera.zoom >= config.min_zoom && camera.zoom <= config.max_zoom);
            prop_assert!(camera.pan.x.is_finite() && camera.pan.y.is_finite());
        }
    }
}
