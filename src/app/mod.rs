use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Result;
use eframe::egui::{self, Context};
use log::{error, info};

use crate::engine::{EngineConfig, GraphView};
use crate::model::{GraphData, load_graph_file};

mod canvas;
mod render_utils;
mod ui;

/// Where the desktop host reads its graph and optional engine config from.
#[derive(Clone, Debug)]
pub struct GraphSource {
    pub graph_path: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl GraphSource {
    fn load(&self) -> Result<LoadedGraph> {
        let config = self
            .config_path
            .as_deref()
            .map(EngineConfig::from_json_file)
            .transpose()?;
        let data = load_graph_file(&self.graph_path)?;
        Ok(LoadedGraph { data, config })
    }

    fn label(&self) -> String {
        self.graph_path.display().to_string()
    }
}

struct LoadedGraph {
    data: GraphData,
    /// `None` when no config file was given; reloads then keep the live
    /// config edited in the controls panel.
    config: Option<EngineConfig>,
}

type LoadResult = Result<LoadedGraph, String>;

pub struct GraphLensApp {
    source: GraphSource,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    data: GraphData,
    view: GraphView,
    search: String,
    selected: Option<String>,
    hovered: Option<String>,
    last_click: Option<String>,
    pointer: PointerTracker,
    fit_pending: bool,
}

/// Raw pointer bookkeeping needed to turn egui's input stream into
/// engine pointer events.
#[derive(Clone, Copy, Debug, Default)]
struct PointerTracker {
    inside: bool,
    pressed: bool,
}

impl GraphLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: GraphSource) -> Self {
        let state = Self::start_load(&source);
        Self {
            source,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: GraphSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            info!("loading graph from {}", source.label());
            let result = source.load().map_err(|error| {
                error!("graph load failed: {error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: &GraphSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source.clone()),
        }
    }
}

impl eframe::App for GraphLensApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(loaded)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(loaded.data, loaded.config.unwrap_or_default()))));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.source));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source.label(), &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(loaded)) => model.replace_data(loaded.data, loaded.config),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::model::{Node, NodeKind};

    fn graph_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "nodes": [ { "id": "a", "kind": "file" } ], "edges": [] }"#)
            .unwrap();
        file
    }

    #[test]
    fn config_is_only_loaded_when_a_file_is_given() {
        let graph = graph_file();
        let source = GraphSource {
            graph_path: graph.path().to_path_buf(),
            config_path: None,
        };
        assert!(source.load().unwrap().config.is_none());

        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        config_file
            .write_all(br#"{ "physics": { "gravity": 0.01 } }"#)
            .unwrap();
        let source = GraphSource {
            config_path: Some(config_file.path().to_path_buf()),
            ..source
        };
        let loaded = source.load().unwrap();
        assert_eq!(loaded.config.map(|config| config.physics.gravity), Some(0.01));
    }

    #[test]
    fn reload_without_config_keeps_tuned_physics() {
        let data = GraphData::new(vec![Node::new("a", NodeKind::File, "g")], Vec::new());
        let mut model = ViewModel::new(data.clone(), EngineConfig::default());

        let mut tuned = *model.view.engine().config();
        tuned.physics.gravity = 0.02;
        model.view.engine_mut().set_config(tuned);

        model.replace_data(data.clone(), None);
        assert_eq!(model.view.engine().config().physics.gravity, 0.02);

        model.replace_data(data, Some(EngineConfig::default()));
        assert_eq!(
            model.view.engine().config().physics.gravity,
            EngineConfig::default().physics.gravity
        );
    }
}
