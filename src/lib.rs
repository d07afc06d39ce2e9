//! Force-directed layout and interaction engine for codebase exploration graphs.
//!
//! The [`engine`] module is host-agnostic: it consumes a [`model::GraphData`]
//! set, runs the simulation, interprets pointer input and emits draw commands.
//! The [`app`] module hosts it inside an `eframe` window.

pub mod app;
pub mod engine;
pub mod model;
mod util;
