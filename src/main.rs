use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use graph_lens::app::{GraphLensApp, GraphSource};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph data file (JSON with `nodes` and `edges`).
    graph: PathBuf,

    /// Optional engine configuration file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1440.0)]
    width: f32,

    #[arg(long, default_value_t = 920.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };
    let source = GraphSource {
        graph_path: args.graph,
        config_path: args.config,
    };

    eframe::run_native(
        "graph-lens",
        options,
        Box::new(move |cc| Ok(Box::new(GraphLensApp::new(cc, source)))),
    )
}
