//! # Procedural Geometry Generation
//!
//! Shapes for the decorative environment (ground, water, trees, fallback
//! birds), generated with proper normals so nothing needs an external model
//! file.

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::{Mesh, Vertex3D};

/// Generated geometry ready for GPU upload.
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Converts into the mesh format the scene renders.
    pub fn into_mesh(self) -> Mesh {
        let vertices: Vec<Vertex3D> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();
        Mesh::from_vertices(vertices, self.indices)
    }
}
