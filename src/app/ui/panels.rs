use eframe::egui::{self, Align, Context, Layout, RichText};

use crate::engine::{EngineConfig, GraphEngine, GraphView};
use crate::model::GraphData;
use crate::util::count_label;

use super::super::{PointerTracker, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(data: GraphData, config: EngineConfig) -> Self {
        let mut engine = GraphEngine::with_default_profile(config);
        engine.set_data(&data);

        Self {
            data,
            view: GraphView::start(engine),
            search: String::new(),
            selected: None,
            hovered: None,
            last_click: None,
            pointer: PointerTracker::default(),
            fit_pending: true,
        }
    }

    /// Feeds a reloaded data set into the running engine. Positions survive
    /// when the node set is structurally unchanged.
    /// A `None` config keeps whatever the controls panel has tuned.
    pub(in crate::app) fn replace_data(&mut self, data: GraphData, config: Option<EngineConfig>) {
        let engine = self.view.engine_mut();
        if let Some(config) = config {
            engine.set_config(config);
        }
        engine.set_data(&data);
        self.data = data;

        if let Some(selected) = &self.selected
            && self.data.node(selected).is_none()
        {
            self.set_selected(None);
        }
        if self.view.engine().hovered_index().is_none() {
            self.hovered = None;
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }

        self.view.engine_mut().set_selected(selected.as_deref());
        self.selected = selected;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source_label: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("graph-lens");
                    ui.separator();
                    ui.label(source_label);
                    ui.label(count_label(self.data.node_count() as u32, "node", "nodes"));
                    ui.label(count_label(self.data.edge_count() as u32, "edge", "edges"));

                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Fit view").clicked() {
                        self.view.engine_mut().fit_to_graph();
                    }
                    if ui.button("Reset view").clicked() {
                        self.view.engine_mut().reset_camera();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("zoom {:.2}", self.view.engine().camera().zoom));
                        if let Some(hovered) = &self.hovered {
                            ui.label(format!("hover: {hovered}"));
                        }
                    });
                });
            });

        let isolated = self
            .view
            .engine()
            .isolation()
            .focal_id()
            .map(str::to_string);
        if let Some(focal_id) = isolated {
            egui::TopBottomPanel::top("isolation_banner")
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format!("Isolating {focal_id} and its neighbors")).strong());
                        if ui.button("Clear isolation").clicked() {
                            self.view.engine_mut().clear_isolation();
                        }
                        ui.weak("Esc clears, alt-click or right-click toggles");
                    });
                });
        }

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }
}
