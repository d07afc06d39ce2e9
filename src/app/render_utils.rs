use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};

use crate::engine::{DrawCommand, Scene, TextAnchor, TextMeasure};

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const GRID: Color32 = Color32::from_rgba_premultiplied(16, 19, 22, 70);

/// `TextMeasure` backed by egui's font layout.
pub(super) struct PainterMeasure<'a> {
    pub(super) painter: &'a Painter,
}

impl TextMeasure for PainterMeasure<'_> {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), FontId::proportional(font_size), Color32::WHITE)
            .size()
            .x
    }
}

/// Grid anchored to the world origin; `origin` is where it lands on screen.
pub(super) fn draw_background(painter: &Painter, rect: Rect, origin: Pos2, zoom: f32) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let stroke = Stroke::new(1.0, GRID);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn paint_scene(painter: &Painter, scene: &Scene) {
    for command in scene.commands() {
        paint_command(painter, command);
    }
}

fn paint_command(painter: &Painter, command: &DrawCommand) {
    match command {
        DrawCommand::Line {
            from,
            to,
            width,
            color,
            dash,
        } => {
            let stroke = Stroke::new(*width, *color);
            match dash {
                Some(pattern) => {
                    painter.extend(Shape::dashed_line(&[*from, *to], stroke, pattern.dash, pattern.gap));
                }
                None => {
                    painter.line_segment([*from, *to], stroke);
                }
            }
        }
        DrawCommand::Polygon { points, fill } => {
            painter.add(Shape::convex_polygon(points.clone(), *fill, Stroke::NONE));
        }
        DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            if *fill != Color32::TRANSPARENT {
                painter.circle_filled(*center, *radius, *fill);
            }
            if let Some((width, color)) = stroke {
                painter.circle_stroke(*center, *radius, Stroke::new(*width, *color));
            }
        }
        DrawCommand::Rect {
            rect,
            corner_radius,
            fill,
            stroke,
        } => {
            painter.rect_filled(*rect, *corner_radius, *fill);
            if let Some((width, color)) = stroke {
                painter.rect_stroke(*rect, *corner_radius, Stroke::new(*width, *color), StrokeKind::Inside);
            }
        }
        DrawCommand::Text {
            pos,
            text,
            size,
            color,
            anchor,
        } => {
            let align = match anchor {
                TextAnchor::Center => Align2::CENTER_CENTER,
                TextAnchor::LeftTop => Align2::LEFT_TOP,
            };
            painter.text(*pos, align, text, FontId::proportional(*size), *color);
        }
    }
}

pub(super) fn world_origin_on_screen(rect: Rect, pan: Vec2, zoom: f32) -> Pos2 {
    rect.center() + pan * zoom
}
