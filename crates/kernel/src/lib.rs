//! World Kernel: topic classification, scene templates, and world descriptors.
//!
//! # Invariants
//! - Classification is a priority list: the first matching keyword group wins.
//! - Every delivered [`WorldDescriptor`] has at least one object.
//! - Descriptors are immutable; a new world replaces the old one wholesale.
//! - Everything except the build timestamp and id is deterministic.

pub mod builder;
pub mod catalog;
pub mod classify;
pub mod object;
pub mod templates;
pub mod world;

pub use builder::{BuildError, WorldBuilder, validate_topic};
pub use catalog::{Difficulty, PrebuiltCard, card, catalog};
pub use classify::{Category, classify, matched_keyword};
pub use object::{ObjectDescriptor, ShapeKind};
pub use templates::{learning_objectives, scene_template};
pub use world::{AgeGroup, Complexity, ParseEnumError, WorldDescriptor, WorldId};

pub fn crate_info() -> &'static str {
    "eduverse-kernel v0.1.0"
}
