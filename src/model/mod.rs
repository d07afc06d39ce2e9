mod graph;
mod load;

pub use graph::{Edge, EdgeKind, GraphData, Node, NodeKind, NodeMetrics};
pub use load::{load_graph_file, parse_graph_json};
