use crate::model::{Node, NodeKind};
use crate::util::{count_label, last_segment};

/// Text shown in a node's tooltip, before wrapping and truncation.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipText {
    pub title: String,
    pub subtitle: String,
    pub description: Option<String>,
}

/// Per-kind presentation rules plugged into the engine.
///
/// One profile serves every graph flavor; views that need different sizing or
/// grouping supply their own implementation instead of a separate engine.
pub trait NodeProfile {
    /// World-space radius, already clamped.
    fn radius(&self, node: &Node) -> f32;

    fn label(&self, node: &Node) -> String;

    fn tooltip(&self, node: &Node) -> TooltipText;

    /// Cluster key used for color and the cohesion force.
    fn group_key<'a>(&self, node: &'a Node) -> &'a str {
        &node.group
    }

    /// Whether a click on the node should reach the collaborator.
    /// Non-clickable nodes stay draggable and hoverable.
    fn is_clickable(&self, _node: &Node) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusRule {
    pub base: f32,
    pub scale: f32,
    pub min: f32,
    pub max: f32,
}

impl RadiusRule {
    pub fn apply(self, metric: u32) -> f32 {
        (self.base + (metric as f32).sqrt() * self.scale)
            .min(self.max)
            .max(self.min)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupBy {
    #[default]
    Group,
    Kind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindProfile {
    pub group_by: GroupBy,
    pub scope: RadiusRule,
    pub module: RadiusRule,
    pub file: RadiusRule,
    pub entity: RadiusRule,
}

impl Default for KindProfile {
    fn default() -> Self {
        Self {
            group_by: GroupBy::Group,
            scope: RadiusRule {
                base: 12.0,
                scale: 2.2,
                min: 10.0,
                max: 34.0,
            },
            module: RadiusRule {
                base: 9.0,
                scale: 1.6,
                min: 8.0,
                max: 28.0,
            },
            file: RadiusRule {
                base: 7.0,
                scale: 1.2,
                min: 6.0,
                max: 20.0,
            },
            entity: RadiusRule {
                base: 5.0,
                scale: 1.0,
                min: 4.0,
                max: 14.0,
            },
        }
    }
}

impl KindProfile {
    pub fn grouped_by(group_by: GroupBy) -> Self {
        Self {
            group_by,
            ..Self::default()
        }
    }

    fn size_metric(node: &Node) -> u32 {
        match node.kind {
            NodeKind::Scope => node.metrics.file_count,
            NodeKind::Module | NodeKind::File => node.metrics.entity_count,
            NodeKind::Entity => node.metrics.import_count,
        }
    }
}

impl NodeProfile for KindProfile {
    fn radius(&self, node: &Node) -> f32 {
        let rule = match node.kind {
            NodeKind::Scope => self.scope,
            NodeKind::Module => self.module,
            NodeKind::File => self.file,
            NodeKind::Entity => self.entity,
        };
        rule.apply(Self::size_metric(node))
    }

    fn label(&self, node: &Node) -> String {
        if let Some(label) = node.label.as_deref().map(str::trim)
            && !label.is_empty()
        {
            return label.to_string();
        }

        match node.kind {
            NodeKind::Scope => node.id.clone(),
            NodeKind::Module => last_segment(&node.id, &["::", "/", "."]).to_string(),
            NodeKind::File => last_segment(&node.id, &["/", "\\"]).to_string(),
            NodeKind::Entity => last_segment(&node.id, &["::", "#"]).to_string(),
        }
    }

    fn tooltip(&self, node: &Node) -> TooltipText {
        let metrics = &node.metrics;
        let mut parts = vec![node.kind.label().to_string()];
        match node.kind {
            NodeKind::Scope => {
                parts.push(count_label(metrics.file_count, "file", "files"));
                if let Some(children) = metrics.child_count {
                    parts.push(count_label(children, "module", "modules"));
                }
            }
            NodeKind::Module => {
                parts.push(count_label(metrics.entity_count, "entity", "entities"));
                parts.push(count_label(metrics.import_count, "import", "imports"));
            }
            NodeKind::File => {
                parts.push(count_label(metrics.entity_count, "entity", "entities"));
            }
            NodeKind::Entity => {
                parts.push(count_label(metrics.import_count, "reference", "references"));
            }
        }
        if !node.group.is_empty() {
            parts.push(node.group.clone());
        }

        TooltipText {
            title: self.label(node),
            subtitle: parts.join(" · "),
            description: node.description.clone(),
        }
    }

    fn group_key<'a>(&self, node: &'a Node) -> &'a str {
        match self.group_by {
            GroupBy::Group => &node.group,
            GroupBy::Kind => node.kind.label(),
        }
    }

    fn is_clickable(&self, node: &Node) -> bool {
        match node.kind {
            NodeKind::Scope | NodeKind::Module => node.metrics.child_count != Some(0),
            NodeKind::File | NodeKind::Entity => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeMetrics;

    fn module_with_entities(count: u32) -> Node {
        Node::new("crate::engine", NodeKind::Module, "engine").with_metrics(NodeMetrics {
            entity_count: count,
            ..NodeMetrics::default()
        })
    }

    #[test]
    fn radius_is_monotonic_and_clamped() {
        let profile = KindProfile::default();
        let mut previous = 0.0;
        for count in [0, 1, 4, 16, 64, 256, 10_000] {
            let radius = profile.radius(&module_with_entities(count));
            assert!(radius >= previous);
            assert!(radius >= profile.module.min && radius <= profile.module.max);
            previous = radius;
        }
        assert_eq!(profile.radius(&module_with_entities(1_000_000)), profile.module.max);
    }

    #[test]
    fn labels_follow_kind() {
        let profile = KindProfile::default();
        assert_eq!(profile.label(&module_with_entities(0)), "engine");
        let file = Node::new("src/engine/camera.rs", NodeKind::File, "engine");
        assert_eq!(profile.label(&file), "camera.rs");
        let labeled = file.clone().with_label("Camera");
        assert_eq!(profile.label(&labeled), "Camera");
    }

    #[test]
    fn leaf_scopes_are_not_clickable() {
        let profile = KindProfile::default();
        let leaf = Node::new("docs", NodeKind::Scope, "docs").with_metrics(NodeMetrics {
            child_count: Some(0),
            ..NodeMetrics::default()
        });
        assert!(!profile.is_clickable(&leaf));
        let unknown = Node::new("docs", NodeKind::Scope, "docs");
        assert!(profile.is_clickable(&unknown));
        let entity = Node::new("fn main", NodeKind::Entity, "bin").with_metrics(NodeMetrics {
            child_count: Some(0),
            ..NodeMetrics::default()
        });
        assert!(profile.is_clickable(&entity));
    }

    #[test]
    fn tooltip_summarizes_metrics() {
        let profile = KindProfile::default();
        let tooltip = profile.tooltip(&module_with_entities(3));
        assert_eq!(tooltip.title, "engine");
        assert_eq!(tooltip.subtitle, "module · 3 entities · 0 imports · engine");
    }

    #[test]
    fn kind_grouping_ignores_group_field() {
        let profile = KindProfile::grouped_by(GroupBy::Kind);
        assert_eq!(profile.group_key(&module_with_entities(0)), "module");
    }
}
