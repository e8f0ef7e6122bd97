use crate::graph::{Blend, Geometry, Material, NodeKind, NodeTag, SceneGraph, SceneNode, Shading};
use eduverse_common::{Color, Transform};
use eduverse_kernel::{ObjectDescriptor, ShapeKind, WorldDescriptor};
use glam::Vec3;

pub const OBJECT_OPACITY: f32 = 0.9;
pub const GLOW_OPACITY: f32 = 0.2;
pub const GLOW_SCALE: f32 = 1.1;
pub const RING_OPACITY: f32 = 0.15;

const SPHERE_SEGMENTS: u32 = 32;
const STRAND_SEGMENTS: u32 = 8;
const RING_SEGMENTS: u32 = 96;
/// Rings closer to the axis than this are not drawn.
const MIN_RING_RADIUS: f32 = 1e-3;

/// Geometry for an object's shape and scale.
pub fn geometry_for(object: &ObjectDescriptor) -> Geometry {
    match object.kind {
        ShapeKind::Sphere => Geometry::Sphere {
            radius: object.scale.max_extent(),
            segments: SPHERE_SEGMENTS,
        },
        ShapeKind::Box => Geometry::Box {
            size: object.scale.as_vec3(),
        },
        // One strand of a double helix: a thin upright column.
        ShapeKind::Helix => {
            let s = object.scale.max_extent();
            Geometry::Cylinder {
                radius_top: 0.1 * s,
                radius_bottom: 0.1 * s,
                height: 3.0 * s,
                segments: STRAND_SEGMENTS,
            }
        }
    }
}

/// Add the nodes for every object of `world`: body, glow child and, for
/// orbiting spheres, a ring. Returns the number of nodes added.
pub(crate) fn populate(graph: &mut SceneGraph, world: &WorldDescriptor) -> usize {
    let _span = tracing::info_span!("populate_scene", world = %world.id()).entered();
    let before = graph.len();

    for (index, object) in world.objects().iter().enumerate() {
        let tag = NodeTag::WorldObject {
            world: world.id(),
            object: object.name.clone(),
        };
        let geometry = geometry_for(object);

        let body = graph.add(
            SceneNode::new(
                object.name.clone(),
                NodeKind::Mesh {
                    geometry,
                    material: Material {
                        color: object.color,
                        opacity: OBJECT_OPACITY,
                        shading: Shading::Phong,
                        blend: Blend::Alpha,
                    },
                },
                tag.clone(),
            )
            .with_transform(Transform::from_position(object.position)),
        );

        graph.add_child(
            body,
            SceneNode::new(
                format!("{} (glow)", object.name),
                NodeKind::Mesh {
                    geometry,
                    material: Material {
                        color: object.color,
                        opacity: GLOW_OPACITY,
                        shading: Shading::Unlit,
                        blend: Blend::Additive,
                    },
                },
                tag.clone(),
            )
            .with_transform(Transform::from_uniform_scale(GLOW_SCALE)),
        );

        let radius = object.planar_radius();
        let orbits = index != 0 && object.kind == ShapeKind::Sphere && radius > MIN_RING_RADIUS;
        if orbits {
            graph.add(
                SceneNode::new(
                    format!("{} (orbit)", object.name),
                    NodeKind::Mesh {
                        geometry: Geometry::Ring {
                            radius,
                            segments: RING_SEGMENTS,
                        },
                        material: Material {
                            color: Color::WHITE,
                            opacity: RING_OPACITY,
                            shading: Shading::Unlit,
                            blend: Blend::Alpha,
                        },
                    },
                    tag,
                )
                .with_transform(Transform::from_position(Vec3::new(
                    0.0,
                    object.position.y,
                    0.0,
                ))),
            );
        }
    }

    let added = graph.len() - before;
    tracing::debug!(added, "scene populated");
    added
}
