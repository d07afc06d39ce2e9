use eframe::egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};

use super::GraphEngine;
use super::palette::{
    ACCENT, HALO, LABEL_FILL, LABEL_TEXT, TOOLTIP_BORDER, TOOLTIP_FILL, TOOLTIP_MUTED,
    blend_color, edge_color, group_color, with_alpha,
};
use super::text::{TextMeasure, strip_markdown, truncate_label, wrap_text};
use crate::model::EdgeKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashPattern {
    pub dash: f32,
    pub gap: f32,
}

impl DashPattern {
    pub fn for_kind(kind: EdgeKind) -> Option<Self> {
        match kind {
            EdgeKind::Contains | EdgeKind::Imports => None,
            EdgeKind::Calls => Some(Self { dash: 6.0, gap: 4.0 }),
            EdgeKind::References => Some(Self { dash: 2.0, gap: 4.0 }),
            EdgeKind::Related => Some(Self { dash: 8.0, gap: 6.0 }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Center,
    LeftTop,
}

/// Screen-space primitive; the host maps each one onto its painter.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Pos2,
        to: Pos2,
        width: f32,
        color: Color32,
        dash: Option<DashPattern>,
    },
    Polygon {
        points: Vec<Pos2>,
        fill: Color32,
    },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Option<(f32, Color32)>,
    },
    Rect {
        rect: Rect,
        corner_radius: f32,
        fill: Color32,
        stroke: Option<(f32, Color32)>,
    },
    Text {
        pos: Pos2,
        text: String,
        size: f32,
        color: Color32,
        anchor: TextAnchor,
    },
}

/// One frame of draw commands, in paint order: edges, nodes, labels, tooltip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub edges: Vec<DrawCommand>,
    pub nodes: Vec<DrawCommand>,
    pub labels: Vec<DrawCommand>,
    pub tooltip: Vec<DrawCommand>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
            && self.nodes.is_empty()
            && self.labels.is_empty()
            && self.tooltip.is_empty()
    }

    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.edges
            .iter()
            .chain(&self.nodes)
            .chain(&self.labels)
            .chain(&self.tooltip)
    }
}

fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn segment_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    if rect.contains(start) || rect.contains(end) {
        return true;
    }
    if start.x.max(end.x) < rect.left()
        || start.x.min(end.x) > rect.right()
        || start.y.max(end.y) < rect.top()
        || start.y.min(end.y) > rect.bottom()
    {
        return false;
    }

    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    (0..4).any(|side| segments_intersect(start, end, corners[side], corners[(side + 1) % 4]))
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);
    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

fn arrowhead(tip: Pos2, direction: Vec2, size: f32) -> Vec<Pos2> {
    let base = tip - direction * size;
    let side = vec2(-direction.y, direction.x) * (size * 0.5);
    vec![tip, base + side, base - side]
}

struct NodeView {
    center: Pos2,
    radius: f32,
    alpha: f32,
    on_screen: bool,
}

impl GraphEngine {
    /// Builds the draw commands for the current frame without touching the
    /// simulation.
    pub fn render(&self, measure: &dyn TextMeasure) -> Scene {
        let surface = self.surface;
        let mut scene = Scene::default();
        if self.graph.is_empty() || !surface.is_positive() {
            return scene;
        }

        let views = self
            .graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, sim)| {
                let center = self.camera.to_screen(surface, sim.position);
                let radius = self.screen_radius(index);
                NodeView {
                    center,
                    radius,
                    alpha: self.node_alpha(index),
                    on_screen: circle_visible(surface, center, radius + 4.0),
                }
            })
            .collect::<Vec<_>>();

        self.render_edges(&views, &mut scene.edges);
        self.render_nodes(&views, &mut scene.nodes);
        self.render_labels(&views, measure, &mut scene.labels);
        self.render_tooltip(&views, measure, &mut scene.tooltip);
        scene
    }

    fn node_alpha(&self, index: usize) -> f32 {
        let render = &self.config.render;
        if !self.isolation.is_visible(index) {
            render.dimmed_alpha
        } else if self.search.is_active() && !self.search.matches(index) {
            render.search_dimmed_alpha
        } else {
            1.0
        }
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected.as_deref().and_then(|id| self.graph.index_of(id))
    }

    fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
            .as_deref()
            .and_then(|id| self.graph.index_of(id))
    }

    fn render_edges(&self, views: &[NodeView], out: &mut Vec<DrawCommand>) {
        let render = &self.config.render;
        let zoom_scale = self.camera.zoom.sqrt().clamp(0.6, 1.6);
        let focal = self.isolation.focal();
        let emphasized = [self.state.hovered(), self.selected_index()];

        for edge in self.graph.edges() {
            let (source, target) = (&views[edge.source], &views[edge.target]);
            if !segment_visible(self.surface, source.center, target.center) {
                continue;
            }

            let delta = target.center - source.center;
            let length = delta.length();
            if length <= source.radius + target.radius {
                continue;
            }
            let direction = delta / length;
            let from = source.center + direction * source.radius;
            let tip = target.center - direction * target.radius;

            let incident = |index: Option<usize>| {
                index.is_some_and(|index| index == edge.source || index == edge.target)
            };
            let alpha = match focal {
                Some(_) if !incident(focal) => render.dimmed_alpha,
                _ => source.alpha.min(target.alpha) * 0.75,
            };
            let mut color = edge_color(edge.kind);
            let mut width = render.edge_base_width * (0.5 + edge.weight.min(3.0) * 0.5) * zoom_scale;
            if emphasized.into_iter().any(incident) {
                color = blend_color(color, Color32::WHITE, 0.35);
                width *= 1.4;
            }
            let color = with_alpha(color, alpha);

            let arrow_size = render.arrow_size * zoom_scale;
            let has_arrow = edge.directed && (tip - from).length() > arrow_size * 1.5;
            let to = if has_arrow {
                tip - direction * (arrow_size * 0.6)
            } else {
                tip
            };

            out.push(DrawCommand::Line {
                from,
                to,
                width,
                color,
                dash: DashPattern::for_kind(edge.kind),
            });
            if has_arrow {
                out.push(DrawCommand::Polygon {
                    points: arrowhead(tip, direction, arrow_size),
                    fill: color,
                });
            }
        }
    }

    fn render_nodes(&self, views: &[NodeView], out: &mut Vec<DrawCommand>) {
        let hovered = self.state.hovered();
        let dragged = self.state.dragged();
        let selected = self.selected_index();
        let highlighted = self.highlighted_index();

        for &index in self.graph.draw_order() {
            let view = &views[index];
            if !view.on_screen {
                continue;
            }

            let sim = &self.graph.nodes()[index];
            let mut fill = group_color(sim.group);
            if hovered == Some(index) || dragged == Some(index) {
                fill = blend_color(fill, Color32::WHITE, 0.3);
            }
            let outline = blend_color(fill, Color32::BLACK, 0.45);
            let search_hit = self.search.is_active() && self.search.matches(index);

            out.push(DrawCommand::Circle {
                center: view.center,
                radius: view.radius,
                fill: with_alpha(fill, view.alpha),
                stroke: Some(if search_hit {
                    (2.0, with_alpha(LABEL_TEXT, view.alpha))
                } else {
                    (1.0, with_alpha(outline, view.alpha))
                }),
            });

            if highlighted == Some(index) {
                out.push(DrawCommand::Circle {
                    center: view.center,
                    radius: view.radius + 2.5,
                    fill: Color32::TRANSPARENT,
                    stroke: Some((1.5, with_alpha(ACCENT, view.alpha))),
                });
            }
            if selected == Some(index) {
                out.push(DrawCommand::Circle {
                    center: view.center,
                    radius: view.radius + 4.5,
                    fill: Color32::TRANSPARENT,
                    stroke: Some((2.5, with_alpha(HALO, view.alpha.max(0.5)))),
                });
            }
        }
    }

    fn render_labels(&self, views: &[NodeView], measure: &dyn TextMeasure, out: &mut Vec<DrawCommand>) {
        let render = &self.config.render;
        let forced_nodes = [
            self.state.hovered(),
            self.state.dragged(),
            self.selected_index(),
            self.highlighted_index(),
            self.isolation.focal(),
        ];
        let is_forced = |index: usize| forced_nodes.contains(&Some(index));
        let zoomed_in = self.camera.zoom >= render.label_min_zoom;

        let eligible = |index: usize| {
            let view = &views[index];
            if !view.on_screen || !self.isolation.is_visible(index) {
                return false;
            }
            is_forced(index)
                || (self.search.is_active() && self.search.matches(index))
                || (render.show_labels && (zoomed_in || view.radius >= render.label_min_radius))
        };

        let mut order = self
            .graph
            .draw_order()
            .iter()
            .rev()
            .copied()
            .filter(|&index| eligible(index))
            .collect::<Vec<_>>();
        order.sort_by_key(|&index| !is_forced(index));

        let chip_height = render.label_font_size + render.label_padding_y * 2.0;
        let mut placed: Vec<Rect> = Vec::with_capacity(order.len());
        for index in order {
            let view = &views[index];
            let text = truncate_label(
                &self.profile.label(&self.graph.nodes()[index].node),
                render.label_max_chars,
            );
            if text.is_empty() {
                continue;
            }

            let width = measure.text_width(&text, render.label_font_size) + render.label_padding_x * 2.0;
            let top = view.center.y + view.radius + render.label_gap;
            let chip = Rect::from_min_size(pos2(view.center.x - width * 0.5, top), vec2(width, chip_height));
            if !chip.intersects(self.surface) {
                continue;
            }
            if !is_forced(index) && placed.iter().any(|other| other.intersects(chip)) {
                continue;
            }

            out.push(DrawCommand::Rect {
                rect: chip,
                corner_radius: chip_height * 0.5,
                fill: with_alpha(LABEL_FILL, view.alpha),
                stroke: None,
            });
            out.push(DrawCommand::Text {
                pos: chip.center(),
                text,
                size: render.label_font_size,
                color: with_alpha(LABEL_TEXT, view.alpha),
                anchor: TextAnchor::Center,
            });
            placed.push(chip);
        }
    }

    fn render_tooltip(&self, views: &[NodeView], measure: &dyn TextMeasure, out: &mut Vec<DrawCommand>) {
        let render = &self.config.render;
        let Some(index) = self
            .state
            .hovered()
            .or_else(|| self.selected_index().filter(|&index| self.isolation.is_visible(index)))
        else {
            return;
        };
        let view = &views[index];
        if !view.on_screen {
            return;
        }

        let tooltip = self.profile.tooltip(&self.graph.nodes()[index].node);
        let title = truncate_label(&tooltip.title, render.tooltip_line_chars);
        let subtitle = truncate_label(&tooltip.subtitle, render.tooltip_line_chars);
        let description = tooltip
            .description
            .as_deref()
            .map(|text| {
                wrap_text(
                    &strip_markdown(text),
                    render.tooltip_line_chars,
                    render.tooltip_max_lines,
                    render.tooltip_max_chars,
                )
            })
            .unwrap_or_default();

        let content_width = description
            .iter()
            .map(|line| measure.text_width(line, render.tooltip_text_size))
            .chain([
                measure.text_width(&title, render.tooltip_title_size),
                measure.text_width(&subtitle, render.tooltip_text_size),
            ])
            .fold(0.0_f32, f32::max);
        let width = (content_width + render.tooltip_padding * 2.0)
            .clamp(render.tooltip_min_width, render.tooltip_max_width);

        let title_height = render.tooltip_title_size + 4.0;
        let description_height = if description.is_empty() {
            0.0
        } else {
            4.0 + render.tooltip_line_height * description.len() as f32
        };
        let height = render.tooltip_padding * 2.0 + title_height + render.tooltip_line_height + description_height;

        let surface = self.surface;
        let room_right = surface.right() - (view.center.x + view.radius);
        let room_left = (view.center.x - view.radius) - surface.left();
        let left = if room_right >= room_left {
            view.center.x + view.radius + render.tooltip_gap
        } else {
            view.center.x - view.radius - render.tooltip_gap - width
        };
        let left = left.min(surface.right() - width).max(surface.left());
        let top = (view.center.y - height * 0.5)
            .min(surface.bottom() - height)
            .max(surface.top());
        let rect = Rect::from_min_size(pos2(left, top), vec2(width, height));

        out.push(DrawCommand::Rect {
            rect,
            corner_radius: 6.0,
            fill: TOOLTIP_FILL,
            stroke: Some((1.0, TOOLTIP_BORDER)),
        });

        let text_left = rect.left() + render.tooltip_padding;
        let mut cursor = rect.top() + render.tooltip_padding;
        out.push(DrawCommand::Text {
            pos: pos2(text_left, cursor),
            text: title,
            size: render.tooltip_title_size,
            color: LABEL_TEXT,
            anchor: TextAnchor::LeftTop,
        });
        cursor += title_height;
        out.push(DrawCommand::Text {
            pos: pos2(text_left, cursor),
            text: subtitle,
            size: render.tooltip_text_size,
            color: TOOLTIP_MUTED,
            anchor: TextAnchor::LeftTop,
        });
        cursor += render.tooltip_line_height + 4.0;
        for line in description {
            out.push(DrawCommand::Text {
                pos: pos2(text_left, cursor),
                text: line,
                size: render.tooltip_text_size,
                color: LABEL_TEXT,
                anchor: TextAnchor::LeftTop,
            });
            cursor += render.tooltip_line_height;
        }
    }
}
