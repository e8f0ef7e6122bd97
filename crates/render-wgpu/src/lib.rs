//! wgpu render backend for learning worlds.
//!
//! Draws the scene graph in four passes over one render pass: lit meshes,
//! additive glows, orbit rings and the starfield.
//!
//! # Invariants
//! - The renderer never mutates the scene graph.
//! - Vertex buffers are rebuilt only when the graph's revision changes.
//! - GPU buffers are destroyed when the renderer is dropped.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
