use eframe::egui::{self, RichText, Ui};

use crate::engine::strip_markdown;
use crate::util::count_label;

use super::super::ViewModel;

impl ViewModel {
    /// Hovering a neighbor link highlights that node on the canvas.
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let hovered_link = self.draw_selection(ui);
        self.view
            .engine_mut()
            .set_highlighted(hovered_link.as_deref());
    }

    fn draw_selection(&mut self, ui: &mut Ui) -> Option<String> {
        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node to select it. Alt-click or right-click isolates it.");
            return None;
        };

        let Some(node) = self.data.node(&selected_id) else {
            ui.label("Selected node no longer exists in the graph.");
            return None;
        };

        let engine = self.view.engine();
        let profile = engine.profile();
        let title = profile.label(node);
        let subtitle = profile.tooltip(node).subtitle;
        let clickable = profile.is_clickable(node);
        let description = node.description.as_deref().map(strip_markdown);
        let metrics = node.metrics.clone();
        let is_focal = engine.isolation().focal_id() == Some(selected_id.as_str());
        let neighbors = self
            .data
            .neighbor_ids(&selected_id)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        ui.label(RichText::new(title).strong());
        ui.small(selected_id.as_str());
        ui.label(subtitle);
        ui.add_space(6.0);

        ui.label(count_label(metrics.file_count, "file", "files"));
        ui.label(count_label(metrics.entity_count, "entity", "entities"));
        ui.label(count_label(metrics.import_count, "import", "imports"));
        match metrics.child_count {
            Some(0) => {
                ui.label("leaf (no children)");
            }
            Some(children) => {
                ui.label(count_label(children, "child", "children"));
            }
            None => {}
        }
        if !clickable {
            ui.weak("Not expandable");
        }
        if self.last_click.as_deref() == Some(selected_id.as_str()) {
            ui.weak("Opened by the last click");
        }

        if let Some(description) = description.filter(|text| !text.is_empty()) {
            ui.separator();
            ui.label(description);
        }

        ui.separator();
        ui.horizontal(|ui| {
            let isolate_text = if is_focal { "Clear isolation" } else { "Isolate" };
            if ui.button(isolate_text).clicked() {
                self.view.engine_mut().toggle_isolation(&selected_id);
            }
            if ui.button("Center").clicked() {
                let engine = self.view.engine_mut();
                engine.set_focus_target(None);
                engine.set_focus_target(Some(&selected_id));
            }
        });

        ui.separator();
        ui.label(RichText::new("Neighbors").strong());
        if neighbors.is_empty() {
            ui.label("No edges touch this node.");
            return None;
        }

        let mut hovered_link = None;
        egui::ScrollArea::vertical()
            .id_salt("neighbor_scroll")
            .max_height(320.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for neighbor in &neighbors {
                    let label = self
                        .data
                        .node(neighbor)
                        .map(|node| self.view.engine().profile().label(node))
                        .unwrap_or_else(|| neighbor.clone());
                    let response = ui.link(label).on_hover_text(neighbor.as_str());
                    if response.hovered() {
                        hovered_link = Some(neighbor.clone());
                    }
                    if response.clicked() {
                        self.set_selected(Some(neighbor.clone()));
                    }
                }
            });
        hovered_link
    }
}
