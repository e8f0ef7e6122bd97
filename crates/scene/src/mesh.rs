//! CPU tessellation of [`Geometry`] into indexed vertex data.
//!
//! Backends upload the result as-is; nothing here talks to a GPU.

use crate::graph::Geometry;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl MeshData {
    fn new(topology: Topology) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            topology,
        }
    }

    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        (self.positions.len() - 1) as u32
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

pub fn tessellate(geometry: &Geometry) -> MeshData {
    match *geometry {
        Geometry::Sphere { radius, segments } => sphere(radius, segments.max(3)),
        Geometry::Box { size } => cuboid(size),
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            segments,
        } => cylinder(radius_top, radius_bottom, height, segments.max(3)),
        Geometry::Ring { radius, segments } => ring(radius, segments.max(3)),
    }
}

/// UV sphere with `segments` slices around and `segments / 2` stacks.
fn sphere(radius: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::new(Topology::Triangles);
    let stacks = (segments / 2).max(2);
    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        for slice in 0..=segments {
            let theta = TAU * slice as f32 / segments as f32;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.push(normal * radius, normal);
        }
    }
    let row = segments + 1;
    for stack in 0..stacks {
        for slice in 0..segments {
            let a = stack * row + slice;
            let b = a + row;
            mesh.indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }
    mesh
}

fn cuboid(size: Vec3) -> MeshData {
    let mut mesh = MeshData::new(Topology::Triangles);
    let h = size * 0.5;
    // (normal, tangent u, tangent v) per face; u x v == normal keeps CCW winding.
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    for (normal, u, v) in faces {
        let center = normal * h;
        let du = u * h;
        let dv = v * h;
        let base = mesh.push(center - du - dv, normal);
        mesh.push(center + du - dv, normal);
        mesh.push(center + du + dv, normal);
        mesh.push(center - du + dv, normal);
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::new(Topology::Triangles);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);

    // Side
    for slice in 0..=segments {
        let theta = TAU * slice as f32 / segments as f32;
        let (sin, cos) = theta.sin_cos();
        let normal = Vec3::new(cos, slope, sin).normalize();
        mesh.push(Vec3::new(cos * radius_top, half, sin * radius_top), normal);
        mesh.push(Vec3::new(cos * radius_bottom, -half, sin * radius_bottom), normal);
    }
    for slice in 0..segments {
        let top = slice * 2;
        let bottom = top + 1;
        mesh.indices
            .extend_from_slice(&[top, top + 2, bottom, bottom, top + 2, bottom + 2]);
    }

    // Caps
    for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        let center = mesh.push(Vec3::new(0.0, y, 0.0), normal);
        let first = center + 1;
        for slice in 0..segments {
            let theta = TAU * slice as f32 / segments as f32;
            mesh.push(Vec3::new(theta.cos() * radius, y, theta.sin() * radius), normal);
        }
        for slice in 0..segments {
            let a = first + slice;
            let b = first + (slice + 1) % segments;
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, b, a]);
            } else {
                mesh.indices.extend_from_slice(&[center, a, b]);
            }
        }
    }
    mesh
}

/// Closed loop as a line list.
fn ring(radius: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::new(Topology::Lines);
    for slice in 0..segments {
        let theta = TAU * slice as f32 / segments as f32;
        mesh.push(Vec3::new(theta.cos() * radius, 0.0, theta.sin() * radius), Vec3::Y);
    }
    for slice in 0..segments {
        mesh.indices.extend_from_slice(&[slice, (slice + 1) % segments]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_in_range(mesh: &MeshData) -> bool {
        mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count())
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = tessellate(&Geometry::Sphere {
            radius: 2.0,
            segments: 16,
        });
        assert!(indices_in_range(&mesh));
        assert_eq!(mesh.indices.len() % 3, 0);
        for p in &mesh.positions {
            assert!((p.length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn box_has_24_vertices_36_indices() {
        let mesh = tessellate(&Geometry::Box {
            size: Vec3::new(2.0, 4.0, 6.0),
        });
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let max = mesh
            .positions
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc.max(p.abs()));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn box_winding_matches_normals() {
        let mesh = tessellate(&Geometry::Box { size: Vec3::ONE });
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.positions[tri[k] as usize]);
            let face_normal = (b - a).cross(c - a).normalize();
            let n = mesh.normals[tri[0] as usize];
            assert!(face_normal.dot(n) > 0.99);
        }
    }

    #[test]
    fn cylinder_spans_height() {
        let mesh = tessellate(&Geometry::Cylinder {
            radius_top: 0.1,
            radius_bottom: 0.1,
            height: 3.0,
            segments: 8,
        });
        assert!(indices_in_range(&mesh));
        let top = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let bottom = mesh.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!((top - 1.5).abs() < 1e-6);
        assert!((bottom + 1.5).abs() < 1e-6);
    }

    #[test]
    fn ring_is_closed_line_loop() {
        let mesh = tessellate(&Geometry::Ring {
            radius: 5.0,
            segments: 64,
        });
        assert_eq!(mesh.topology, Topology::Lines);
        assert_eq!(mesh.indices.len(), 128);
        assert_eq!(*mesh.indices.last().unwrap(), 0);
        assert!(mesh.positions.iter().all(|p| p.y == 0.0));
    }
}
