use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node in a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug dumps.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn from_uniform_scale(scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Object scale as authored in a world: a single factor or per-axis factors.
///
/// Serialized as a bare number or a three-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(f32),
    Axes(Vec3),
}

impl Default for Scale {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

impl Scale {
    pub fn as_vec3(&self) -> Vec3 {
        match *self {
            Self::Uniform(s) => Vec3::splat(s),
            Self::Axes(v) => v,
        }
    }

    /// Largest axis factor. Round shapes use this as their radius.
    pub fn max_extent(&self) -> f32 {
        match *self {
            Self::Uniform(s) => s,
            Self::Axes(v) => v.max_element(),
        }
    }
}

impl From<f32> for Scale {
    fn from(s: f32) -> Self {
        Self::Uniform(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_uniqueness() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn scale_uniform_and_axes() {
        assert_eq!(Scale::Uniform(2.0).as_vec3(), Vec3::splat(2.0));
        let axes = Scale::Axes(Vec3::new(1.0, 3.0, 2.0));
        assert_eq!(axes.max_extent(), 3.0);
    }

    #[test]
    fn scale_json_accepts_number_or_array() {
        let uniform: Scale = serde_json::from_str("1.5").unwrap();
        assert_eq!(uniform, Scale::Uniform(1.5));

        let axes: Scale = serde_json::from_str("[4.0, 0.2, 2.0]").unwrap();
        assert_eq!(axes, Scale::Axes(Vec3::new(4.0, 0.2, 2.0)));
    }
}
