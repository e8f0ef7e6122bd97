//! Scene Viewer: turns world descriptors into a renderer-agnostic scene graph.
//!
//! # Invariants
//! - Renderers read the scene graph; they never mutate it.
//! - Lights, background and starfield are created once and never removed.
//! - Every node derived from a world is tagged, and the whole tagged set is
//!   removed before the next world's nodes are added.
//! - Pausing stops animation without touching the scene graph or camera.

mod camera;
mod graph;
mod mapping;
pub mod mesh;
mod renderer;
mod viewer;

pub use camera::OrbitCamera;
pub use graph::{
    Blend, Geometry, Light, Material, NodeKind, NodeTag, SceneGraph, SceneNode, Shading,
    Starfield,
};
pub use mapping::{GLOW_OPACITY, GLOW_SCALE, OBJECT_OPACITY, RING_OPACITY, geometry_for};
pub use renderer::{DebugTextRenderer, Renderer};
pub use viewer::{LoopControl, SceneViewer, ViewerConfig, ViewerState};

pub fn crate_info() -> &'static str {
    "eduverse-scene v0.1.0"
}
