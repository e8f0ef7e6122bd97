//! Shared value types used across the eduverse crates.
//!
//! # Invariants
//! - Everything here is plain data; no type carries behavior beyond conversion.
//! - Parsing from untrusted text degrades to defaults instead of failing at
//!   serde boundaries (see [`Color`]).

mod color;
mod types;

pub use color::{Color, ColorError};
pub use types::{NodeId, Scale, Transform};
