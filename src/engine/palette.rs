use eframe::egui::Color32;

use crate::model::EdgeKind;

pub(super) const EDGE: Color32 = Color32::from_rgb(110, 126, 145);
pub(super) const HALO: Color32 = Color32::from_rgb(255, 214, 102);
pub(super) const ACCENT: Color32 = Color32::from_rgb(94, 234, 212);
pub(super) const LABEL_FILL: Color32 = Color32::from_rgba_premultiplied(24, 29, 37, 220);
pub(super) const LABEL_TEXT: Color32 = Color32::from_rgb(226, 232, 240);
pub(super) const TOOLTIP_FILL: Color32 = Color32::from_rgb(30, 36, 46);
pub(super) const TOOLTIP_BORDER: Color32 = Color32::from_rgb(72, 84, 102);
pub(super) const TOOLTIP_MUTED: Color32 = Color32::from_rgb(148, 163, 184);

const GROUP_COLORS: [Color32; 10] = [
    Color32::from_rgb(96, 165, 250),
    Color32::from_rgb(244, 114, 182),
    Color32::from_rgb(74, 222, 128),
    Color32::from_rgb(251, 191, 36),
    Color32::from_rgb(167, 139, 250),
    Color32::from_rgb(45, 212, 191),
    Color32::from_rgb(248, 113, 113),
    Color32::from_rgb(163, 230, 53),
    Color32::from_rgb(251, 146, 60),
    Color32::from_rgb(129, 140, 248),
];

pub(super) fn group_color(group: usize) -> Color32 {
    GROUP_COLORS[group % GROUP_COLORS.len()]
}

pub(super) fn edge_color(kind: EdgeKind) -> Color32 {
    match kind {
        EdgeKind::Contains => Color32::from_rgb(100, 116, 139),
        EdgeKind::Imports => EDGE,
        EdgeKind::Calls => Color32::from_rgb(125, 211, 252),
        EdgeKind::References => Color32::from_rgb(196, 181, 253),
        EdgeKind::Related => Color32::from_rgb(148, 163, 184),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

/// Same color at `alpha` times its current opacity.
pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * alpha.clamp(0.0, 1.0)).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_colors_cycle() {
        assert_eq!(group_color(0), group_color(GROUP_COLORS.len()));
        assert_ne!(group_color(0), group_color(1));
    }

    #[test]
    fn with_alpha_scales_opacity() {
        let faded = with_alpha(Color32::from_rgb(200, 100, 50), 0.5);
        assert_eq!(faded.to_srgba_unmultiplied()[3], 128);
        assert_eq!(with_alpha(Color32::RED, 1.0), Color32::RED);
    }

    #[test]
    fn blend_endpoints() {
        let black = Color32::BLACK;
        let white = Color32::WHITE;
        assert_eq!(blend_color(black, white, 0.0), black);
        assert_eq!(blend_color(black, white, 1.0), white);
    }
}
