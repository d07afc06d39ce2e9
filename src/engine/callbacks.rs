use crate::model::Node;

/// Notifications raised synchronously while pointer input is processed.
///
/// Every method has a no-op default so hosts implement only what they use.
pub trait GraphCallbacks {
    fn on_node_click(&mut self, _node: &Node) {}

    /// Called after the engine has already toggled isolation for `node`.
    fn on_node_isolate_toggle(&mut self, _node: &Node) {}

    /// Called only when the hovered node changes, including to `None`.
    fn on_hover_node(&mut self, _node: Option<&Node>) {}

    /// Called on the pointer-down that starts any gesture.
    fn on_graph_interact(&mut self) {}
}

impl GraphCallbacks for () {}

/// Owned record of a callback, for hosts that apply them after the frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    NodeClicked(String),
    IsolateToggled(String),
    HoverChanged(Option<String>),
    Interacted,
}

impl GraphCallbacks for Vec<GraphEvent> {
    fn on_node_click(&mut self, node: &Node) {
        self.push(GraphEvent::NodeClicked(node.id.clone()));
    }

    fn on_node_isolate_toggle(&mut self, node: &Node) {
        self.push(GraphEvent::IsolateToggled(node.id.clone()));
    }

    fn on_hover_node(&mut self, node: Option<&Node>) {
        self.push(GraphEvent::HoverChanged(node.map(|node| node.id.clone())));
    }

    fn on_graph_interact(&mut self) {
        self.push(GraphEvent::Interacted);
    }
}
