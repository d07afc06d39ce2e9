use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Scope,
    Module,
    File,
    Entity,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Scope => "scope",
            Self::Module => "module",
            Self::File => "file",
            Self::Entity => "entity",
        }
    }
}

/// Counts that drive a node's rendered size.
///
/// `child_count` is optional: `None` means the collaborator did not report
/// children, `Some(0)` marks a leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeMetrics {
    pub file_count: u32,
    pub entity_count: u32,
    pub import_count: u32,
    pub child_count: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub metrics: NodeMetrics,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            group: group.into(),
            label: None,
            description: None,
            metrics: NodeMetrics::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metrics(mut self, metrics: NodeMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Contains,
    Imports,
    Calls,
    References,
    #[default]
    Related,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Imports => "imports",
            Self::Calls => "calls",
            Self::References => "references",
            Self::Related => "related",
        }
    }
}

fn default_weight() -> f32 {
    1.0
}

fn default_directed() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Edge {
    #[serde(alias = "source")]
    pub from: String,
    #[serde(alias = "target")]
    pub to: String,
    #[serde(default)]
    pub kind: EdgeKind,
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default = "default_directed")]
    pub directed: bool,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::default(),
            weight: default_weight(),
            directed: default_directed(),
        }
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    /// Weight used by the engine: non-finite or non-positive weights count as 1.
    pub fn effective_weight(&self) -> f32 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            1.0
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default, alias = "links")]
    pub edges: Vec<Edge>,
}

impl GraphData {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Ids of nodes sharing an edge with `id`, in edge order, without duplicates.
    pub fn neighbor_ids(&self, id: &str) -> Vec<&str> {
        let mut neighbors: Vec<&str> = Vec::new();
        for edge in &self.edges {
            let other = if edge.from == id {
                edge.to.as_str()
            } else if edge.to == id {
                edge.from.as_str()
            } else {
                continue;
            };
            if other != id && !neighbors.contains(&other) {
                neighbors.push(other);
            }
        }
        neighbors
    }
}
