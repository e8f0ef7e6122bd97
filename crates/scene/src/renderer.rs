use crate::camera::OrbitCamera;
use crate::graph::{Geometry, Light, NodeKind, SceneGraph};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene graph and camera and produces output. It may
/// cache derived data internally but never mutates the scene.
pub trait Renderer {
    type Output;

    /// Render one frame.
    fn render(&mut self, scene: &SceneGraph, camera: &OrbitCamera) -> Self::Output;
}

/// Plain-text dump of the scene. Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &SceneGraph, camera: &OrbitCamera) -> String {
        let mut out = String::new();
        let eye = camera.position();
        let _ = writeln!(
            out,
            "=== Scene (revision={}, background={}) ===",
            scene.revision(),
            scene.background()
        );
        let _ = writeln!(
            out,
            "Nodes: {} ({} persistent, {} world)",
            scene.len(),
            scene.persistent_count(),
            scene.world_object_count()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) fov={:.0}",
            eye.x,
            eye.y,
            eye.z,
            camera.fov.to_degrees()
        );

        for (id, node) in scene.nodes() {
            let p = scene.world_matrix(id).w_axis;
            let what = match &node.kind {
                NodeKind::Light(Light::Ambient { color, intensity }) => {
                    format!("ambient {color} x{intensity:.1}")
                }
                NodeKind::Light(Light::Directional {
                    color, intensity, ..
                }) => format!("directional {color} x{intensity:.1}"),
                NodeKind::Starfield(stars) => format!("starfield {} points", stars.points.len()),
                NodeKind::Mesh { geometry, material } => {
                    let shape = match geometry {
                        Geometry::Sphere { radius, .. } => format!("sphere r={radius:.2}"),
                        Geometry::Box { size } => {
                            format!("box {:.2}x{:.2}x{:.2}", size.x, size.y, size.z)
                        }
                        Geometry::Cylinder { height, .. } => format!("cylinder h={height:.2}"),
                        Geometry::Ring { radius, .. } => format!("ring r={radius:.2}"),
                    };
                    format!("{shape} {} a={:.2}", material.color, material.opacity)
                }
            };
            let _ = writeln!(
                out,
                "  [{}] {:<24} {:<36} pos=({:.2}, {:.2}, {:.2})",
                id.short(),
                node.name,
                what,
                p.x,
                p.y,
                p.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::{SceneViewer, ViewerConfig};
    use eduverse_kernel::{WorldBuilder, card};

    #[test]
    fn renders_persistent_content() {
        let viewer = SceneViewer::new(ViewerConfig::default());
        let out = DebugTextRenderer::new().render(viewer.graph(), viewer.camera());
        assert!(out.contains("background=#000510"));
        assert!(out.contains("Nodes: 3 (3 persistent, 0 world)"));
        assert!(out.contains("starfield 1000 points"));
        assert!(out.contains("ambient #404040"));
    }

    #[test]
    fn renders_world_objects() {
        let mut viewer = SceneViewer::new(ViewerConfig::default());
        let world = WorldBuilder::new().from_card(card(1).unwrap()).unwrap();
        viewer.show_world(world);
        let out = DebugTextRenderer::new().render(viewer.graph(), viewer.camera());
        assert!(out.contains("Sun"));
        assert!(out.contains("Mars (orbit)"));
        assert!(out.contains("sphere r=2.00"));
        assert!(out.contains("ring r="));
    }

    #[test]
    fn rendering_leaves_scene_untouched() {
        let viewer = SceneViewer::new(ViewerConfig::default());
        let revision = viewer.graph().revision();
        let mut renderer = DebugTextRenderer::new();
        renderer.render(viewer.graph(), viewer.camera());
        assert_eq!(viewer.graph().revision(), revision);
    }
}
