use eduverse_common::{Color, Scale};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive shape an object is drawn with.
///
/// Unknown names fall back to [`ShapeKind::Sphere`], the default shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    #[default]
    Sphere,
    Box,
    Helix,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Helix => "helix",
        }
    }

    /// Map a shape name onto a known kind, defaulting to sphere.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sphere" => Self::Sphere,
            "box" => Self::Box,
            "helix" => Self::Helix,
            other => {
                tracing::warn!("unknown shape {other:?}; drawing a sphere");
                Self::Sphere
            }
        }
    }
}

impl From<String> for ShapeKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One declarative item in a learning world. Carries no behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default)]
    pub description: String,
}

impl ObjectDescriptor {
    pub fn new(kind: ShapeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            position: Vec3::ZERO,
            color: Color::default(),
            scale: Scale::default(),
            description: String::new(),
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn color(mut self, packed: u32) -> Self {
        self.color = Color::from_u32(packed);
        self
    }

    pub fn scale(mut self, scale: impl Into<Scale>) -> Self {
        self.scale = scale.into();
        self
    }

    pub fn scale_xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Scale::Axes(Vec3::new(x, y, z));
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Distance from the vertical axis through the origin, on the XZ plane.
    pub fn planar_radius(&self) -> f32 {
        Vec3::new(self.position.x, 0.0, self.position.z).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_shape_falls_back_to_sphere() {
        assert_eq!(ShapeKind::from_name("pyramid"), ShapeKind::Sphere);
        assert_eq!(ShapeKind::from_name(" Helix "), ShapeKind::Helix);
    }

    #[test]
    fn json_uses_type_field() {
        let obj = ObjectDescriptor::new(ShapeKind::Box, "Crate")
            .at(1.0, 2.0, 3.0)
            .color(0x06b6d4);
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["type"], "box");
        assert_eq!(json["color"], "#06B6D4");
        assert_eq!(json["position"], serde_json::json!([1.0, 2.0, 3.0]));
    }

    #[test]
    fn lenient_json_defaults_missing_fields() {
        let obj: ObjectDescriptor =
            serde_json::from_str(r#"{"type": "cone", "name": "Mystery", "color": "bogus"}"#)
                .unwrap();
        assert_eq!(obj.kind, ShapeKind::Sphere);
        assert_eq!(obj.color, Color::WHITE);
        assert_eq!(obj.position, Vec3::ZERO);
        assert_eq!(obj.scale, Scale::Uniform(1.0));
    }

    #[test]
    fn planar_radius_ignores_height() {
        let obj = ObjectDescriptor::new(ShapeKind::Sphere, "Mars").at(3.0, 7.0, 4.0);
        assert!((obj.planar_radius() - 5.0).abs() < 1e-6);
    }
}
