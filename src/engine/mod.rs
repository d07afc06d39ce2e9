//! Host-agnostic layout and interaction engine.
//!
//! [`GraphEngine`] owns the simulation, camera and pointer state for one
//! graph. Hosts feed it data and pointer input, call [`GraphEngine::tick`]
//! once per frame and paint the [`Scene`] returned by
//! [`GraphEngine::render`]. [`GraphView`] bundles that loop behind a
//! start/stop handle.

mod callbacks;
mod camera;
mod config;
mod interaction;
mod isolation;
mod palette;
mod physics;
mod profile;
mod scene;
mod search;
mod seed;
mod sim;
mod text;
mod view;

use eframe::egui::{Rect, Vec2};
use log::{debug, info};

pub use callbacks::{GraphCallbacks, GraphEvent};
pub use camera::Camera;
pub use config::{CameraConfig, EngineConfig, InteractionConfig, PhysicsConfig, RenderConfig};
pub use interaction::InteractionState;
pub use isolation::Isolation;
pub use profile::{GroupBy, KindProfile, NodeProfile, RadiusRule, TooltipText};
pub use scene::{DashPattern, DrawCommand, Scene, TextAnchor};
pub use sim::{SimEdge, SimGraph, SimNode};
pub use text::{MonospaceMeasure, TextMeasure, strip_markdown, truncate_label, wrap_text};
pub use view::{GraphView, PointerEvent};

use interaction::PressRecord;
use search::SearchFilter;

pub struct GraphEngine {
    config: EngineConfig,
    profile: Box<dyn NodeProfile>,
    graph: SimGraph,
    revision: u64,
    camera: Camera,
    surface: Rect,
    state: InteractionState,
    press: Option<PressRecord>,
    isolation: Isolation,
    selected: Option<String>,
    highlighted: Option<String>,
    focus_target: Option<String>,
    focus_pending: bool,
    search: SearchFilter,
}

impl GraphEngine {
    pub fn new(config: EngineConfig, profile: Box<dyn NodeProfile>) -> Self {
        Self {
            config: config.sanitized(),
            profile,
            graph: SimGraph::empty(),
            revision: 0,
            camera: Camera::default(),
            surface: Rect::NOTHING,
            state: InteractionState::Idle,
            press: None,
            isolation: Isolation::None,
            selected: None,
            highlighted: None,
            focus_target: None,
            focus_pending: false,
            search: SearchFilter::default(),
        }
    }

    pub fn with_default_profile(config: EngineConfig) -> Self {
        Self::new(config, Box::new(KindProfile::default()))
    }

    /// Replaces the data set. A structurally identical set keeps positions
    /// and isolation; anything else reseeds the layout.
    pub fn set_data(&mut self, data: &crate::model::GraphData) {
        if !self.graph.is_empty() && self.graph.same_structure(data, self.profile.as_ref()) {
            self.graph.update_in_place(data, self.profile.as_ref());
            self.graph.reheat(self.config.physics.reheat_alpha);
            self.isolation.recompute(&self.graph);
            debug!("graph data refreshed in place");
        } else {
            self.graph = SimGraph::build(data, self.profile.as_ref(), &self.config.physics);
            self.isolation.clear();
            self.state = InteractionState::Idle;
            self.press = None;
            info!(
                "graph rebuilt: {} nodes, {} edges",
                self.graph.len(),
                self.graph.edges().len()
            );
        }

        self.revision += 1;
        self.refresh_search();
        if self.focus_pending {
            self.apply_focus_target();
        }
    }

    /// Updates the surface used by the world/screen transform. Node
    /// positions are never touched.
    pub fn set_surface(&mut self, surface: Rect) {
        self.surface = surface;
    }

    /// Runs one simulation tick. Returns whether anything moved.
    pub fn tick(&mut self) -> bool {
        physics::step_physics(&mut self.graph, &self.config.physics)
    }

    pub fn reheat(&mut self) {
        self.graph.reheat(self.config.physics.reheat_alpha);
    }

    pub fn set_selected(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    pub fn set_highlighted(&mut self, id: Option<&str>) {
        self.highlighted = id.map(str::to_string);
    }

    /// Sets the isolation focal node. Repeating the current focal id is a
    /// no-op; `None` or an unknown id clears isolation.
    pub fn set_isolated(&mut self, id: Option<&str>) {
        match id {
            Some(id) => self.isolation.set(&self.graph, id),
            None => self.isolation.clear(),
        }
    }

    pub fn toggle_isolation(&mut self, id: &str) {
        self.isolation.toggle(&self.graph, id);
    }

    pub fn clear_isolation(&mut self) {
        self.isolation.clear();
    }

    pub fn set_search(&mut self, query: &str) {
        self.search
            .update(query, &self.graph, self.profile.as_ref(), self.revision);
    }

    fn refresh_search(&mut self) {
        let query = self.search.query().to_string();
        self.set_search(&query);
    }

    /// Recentres the camera when the hint changes to a node that is present.
    /// A hint naming a missing node waits until that node appears.
    pub fn set_focus_target(&mut self, id: Option<&str>) {
        if self.focus_target.as_deref() == id {
            return;
        }

        self.focus_target = id.map(str::to_string);
        self.focus_pending = self.focus_target.is_some();
        self.apply_focus_target();
    }

    fn apply_focus_target(&mut self) {
        let Some(index) = self
            .focus_target
            .as_deref()
            .and_then(|id| self.graph.index_of(id))
        else {
            return;
        };

        self.camera.center_on(self.graph.nodes()[index].position);
        self.focus_pending = false;
    }

    pub fn fit_to_graph(&mut self) {
        if let Some(bounds) = self.graph.bounds() {
            self.camera
                .fit_bounds(self.surface, bounds, &self.config.camera);
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera = Camera::default();
    }

    /// Moves a node to a world position and zeroes its velocity.
    pub fn place_node(&mut self, id: &str, world: Vec2) -> bool {
        let Some(index) = self.graph.index_of(id) else {
            return false;
        };
        self.graph.place(index, world);
        true
    }

    /// Rendered radius of a node in screen pixels at the current zoom.
    pub fn screen_radius(&self, index: usize) -> f32 {
        let Some(node) = self.graph.node(index) else {
            return 0.0;
        };
        let render = &self.config.render;
        (node.radius * self.camera.zoom.powf(render.radius_zoom_exponent))
            .clamp(render.min_screen_radius, render.max_screen_radius)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config.sanitized();
        let zoom = self.camera.zoom;
        self.camera.set_zoom(zoom, &self.config.camera);
    }

    pub fn graph(&self) -> &SimGraph {
        &self.graph
    }

    pub fn profile(&self) -> &dyn NodeProfile {
        self.profile.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn surface(&self) -> Rect {
        self.surface
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.state
    }

    pub fn isolation(&self) -> &Isolation {
        &self.isolation
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.state.hovered()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn highlighted_id(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    pub fn search_match_count(&self) -> usize {
        self.search.match_count()
    }

    pub fn node_position(&self, id: &str) -> Option<Vec2> {
        let index = self.graph.index_of(id)?;
        Some(self.graph.nodes()[index].position)
    }

    pub fn node_velocity(&self, id: &str) -> Option<Vec2> {
        let index = self.graph.index_of(id)?;
        Some(self.graph.nodes()[index].velocity)
    }
}
