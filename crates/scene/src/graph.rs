use eduverse_common::{Color, NodeId, Transform};
use eduverse_kernel::WorldId;
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;

/// Primitive geometry, described by parameters rather than vertex data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f32,
        segments: u32,
    },
    Box {
        size: Vec3,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    /// Flat circle on the XZ plane, drawn as lines.
    Ring {
        radius: f32,
        segments: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Lit by the scene's ambient and directional lights.
    Phong,
    /// Flat color, ignores lights.
    Unlit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    Alpha,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub opacity: f32,
    pub shading: Shading,
    pub blend: Blend,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

/// Background point cloud. Points are in the node's local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Starfield {
    pub points: Vec<Vec3>,
    pub color: Color,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh {
        geometry: Geometry,
        material: Material,
    },
    Light(Light),
    Starfield(Starfield),
}

/// Ownership tag. World objects are swept out as a set on replacement;
/// persistent nodes live as long as the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTag {
    Persistent,
    WorldObject { world: WorldId, object: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    /// Relative to the parent, or to the world when there is none.
    pub transform: Transform,
    pub parent: Option<NodeId>,
    pub tag: NodeTag,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind, tag: NodeTag) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::default(),
            parent: None,
            tag,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_world_object(&self) -> bool {
        matches!(self.tag, NodeTag::WorldObject { .. })
    }
}

/// Renderer-agnostic scene graph.
///
/// Nodes are stored in a BTreeMap for deterministic iteration. The revision
/// counter changes on every structural edit (add/remove) so backends can
/// tell when cached buffers are stale; transform edits do not bump it.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    background: Color,
    nodes: BTreeMap<NodeId, SceneNode>,
    revision: u64,
}

impl SceneGraph {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            nodes: BTreeMap::new(),
            revision: 0,
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, node);
        self.revision += 1;
        id
    }

    /// Add `node` under `parent`. Returns `None` if the parent is missing.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        node.parent = Some(parent);
        Some(self.add(node))
    }

    /// Remove a node and everything beneath it. Returns the node itself.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let removed = self.nodes.remove(&id)?;
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.remove(child);
        }
        self.revision += 1;
        Some(removed)
    }

    /// Remove every world-object node. Returns how many were removed.
    pub fn remove_world_objects(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, n| !n.is_world_object());
        let removed = before - self.nodes.len();
        if removed > 0 {
            self.revision += 1;
        }
        removed
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(move |(_, n)| n.parent == Some(parent))
            .map(|(id, _)| *id)
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.nodes.values().filter_map(|n| match &n.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        })
    }

    pub fn world_object_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_world_object()).count()
    }

    pub fn persistent_count(&self) -> usize {
        self.nodes.len() - self.world_object_count()
    }

    /// Local-to-world matrix, composing the parent chain.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            matrix = node.transform.matrix() * matrix;
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_mesh(tag: NodeTag) -> SceneNode {
        SceneNode::new(
            "mesh",
            NodeKind::Mesh {
                geometry: Geometry::Box { size: Vec3::ONE },
                material: Material {
                    color: Color::WHITE,
                    opacity: 1.0,
                    shading: Shading::Phong,
                    blend: Blend::Alpha,
                },
            },
            tag,
        )
    }

    fn world_tag() -> NodeTag {
        NodeTag::WorldObject {
            world: WorldId(1),
            object: "Thing".into(),
        }
    }

    #[test]
    fn add_bumps_revision() {
        let mut graph = SceneGraph::new(Color::WHITE);
        let r0 = graph.revision();
        graph.add(unit_mesh(NodeTag::Persistent));
        assert!(graph.revision() > r0);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn add_child_requires_parent() {
        let mut graph = SceneGraph::new(Color::WHITE);
        assert!(graph.add_child(NodeId::new(), unit_mesh(NodeTag::Persistent)).is_none());
        let parent = graph.add(unit_mesh(NodeTag::Persistent));
        let child = graph.add_child(parent, unit_mesh(NodeTag::Persistent)).unwrap();
        assert_eq!(graph.get(child).unwrap().parent, Some(parent));
        assert_eq!(graph.children(parent).count(), 1);
    }

    #[test]
    fn remove_takes_descendants() {
        let mut graph = SceneGraph::new(Color::WHITE);
        let parent = graph.add(unit_mesh(NodeTag::Persistent));
        let child = graph.add_child(parent, unit_mesh(NodeTag::Persistent)).unwrap();
        graph.add_child(child, unit_mesh(NodeTag::Persistent));
        graph.remove(parent);
        assert!(graph.is_empty());
    }

    #[test]
    fn remove_world_objects_keeps_persistent() {
        let mut graph = SceneGraph::new(Color::WHITE);
        graph.add(unit_mesh(NodeTag::Persistent));
        let obj = graph.add(unit_mesh(world_tag()));
        graph.add_child(obj, unit_mesh(world_tag()));

        assert_eq!(graph.remove_world_objects(), 2);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.world_object_count(), 0);
    }

    #[test]
    fn removing_nothing_keeps_revision() {
        let mut graph = SceneGraph::new(Color::WHITE);
        graph.add(unit_mesh(NodeTag::Persistent));
        let r = graph.revision();
        assert_eq!(graph.remove_world_objects(), 0);
        assert_eq!(graph.revision(), r);
    }

    #[test]
    fn transform_edit_does_not_bump_revision() {
        let mut graph = SceneGraph::new(Color::WHITE);
        let id = graph.add(unit_mesh(NodeTag::Persistent));
        let r = graph.revision();
        assert!(graph.set_transform(id, Transform::from_position(Vec3::X)));
        assert_eq!(graph.revision(), r);
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut graph = SceneGraph::new(Color::WHITE);
        let parent = graph.add(
            unit_mesh(NodeTag::Persistent)
                .with_transform(Transform::from_position(Vec3::new(5.0, 0.0, 0.0))),
        );
        let child = graph
            .add_child(
                parent,
                unit_mesh(NodeTag::Persistent).with_transform(Transform::from_uniform_scale(2.0)),
            )
            .unwrap();
        let m = graph.world_matrix(child);
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(7.0, 0.0, 0.0)).length() < 1e-5);
    }
}
