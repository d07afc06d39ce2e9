use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use super::graph::GraphData;

pub fn load_graph_file(path: &Path) -> Result<GraphData> {
    info!("loading graph data from {}", path.display());
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    let data = parse_graph_json(&raw)
        .with_context(|| format!("failed to parse graph file {}", path.display()))?;
    info!(
        "loaded {} nodes and {} edges from {}",
        data.node_count(),
        data.edge_count(),
        path.display()
    );
    Ok(data)
}

/// Accepts either a bare `{ "nodes": [...], "edges": [...] }` document or the
/// same document wrapped in a top-level `"graph"` key.
pub fn parse_graph_json(raw: &str) -> Result<GraphData> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in graph data")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("graph data must be a JSON object"))?;

    let document = match object.get("graph") {
        Some(inner) if inner.is_object() => {
            debug!("graph data uses the wrapped `graph` layout");
            inner
        }
        Some(_) => return Err(anyhow!("`graph` key must hold an object")),
        None => &parsed,
    };

    let has_nodes = document.get("nodes").is_some();
    if !has_nodes {
        return Err(anyhow!("graph data has no `nodes` array"));
    }

    GraphData::deserialize(document).context("invalid node or edge entry in graph data")
}
