// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and validation

use super::BoundingBox;
use crate::error::{Result, VoxelError};
use crate::utils::math::is_finite_point;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Triangle defined by three vertex indices
pub type Face = [usize; 3];

/// Unbatched triangle mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Check that every face index points at an existing vertex
    pub fn validate_faces(&self) -> Result<()> {
        validate_faces(&self.faces, self.vertices.len())
    }
}

/// Batch of meshes that share one face list.
///
/// Each item is a vertex set of the same length; `faces` indexes into every
/// item alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBatch {
    pub vertices: Vec<Vec<Point3<f64>>>,
    pub faces: Vec<Face>,
}

impl MeshBatch {
    pub fn new(vertices: Vec<Vec<Point3<f64>>>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Wrap a single mesh as a batch of one
    pub fn single(mesh: TriangleMesh) -> Self {
        Self {
            vertices: vec![mesh.vertices],
            faces: mesh.faces,
        }
    }

    /// Append another item with the shared topology
    pub fn push_item(&mut self, vertices: Vec<Point3<f64>>) {
        self.vertices.push(vertices);
    }

    pub fn batch_size(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex count per item (0 for an empty batch)
    pub fn vertex_count(&self) -> usize {
        self.vertices.first().map_or(0, Vec::len)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Materialize one item as a standalone mesh
    pub fn item(&self, index: usize) -> Option<TriangleMesh> {
        self.vertices
            .get(index)
            .map(|vertices| TriangleMesh::new(vertices.clone(), self.faces.clone()))
    }

    /// Check the batch invariants: non-empty items of equal length, finite
    /// coordinates and in-range face indices.
    pub fn validate(&self) -> Result<()> {
        validate_batch(&self.vertices, &self.faces)
    }
}

/// Validate batch items and the shared face list without taking ownership
pub fn validate_batch(vertices: &[Vec<Point3<f64>>], faces: &[Face]) -> Result<()> {
    let Some(expected) = vertices.first().map(Vec::len) else {
        return Ok(());
    };

    for (item, points) in vertices.iter().enumerate() {
        if points.is_empty() {
            return Err(VoxelError::EmptyItem { item });
        }
        if points.len() != expected {
            return Err(VoxelError::VertexCountMismatch {
                item,
                expected,
                actual: points.len(),
            });
        }
        if let Some(vertex) = points.iter().position(|v| !is_finite_point(v)) {
            return Err(VoxelError::NonFiniteVertex { item, vertex });
        }
    }

    validate_faces(faces, expected)
}

fn validate_faces(faces: &[Face], vertex_count: usize) -> Result<()> {
    for (face, indices) in faces.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
            return Err(VoxelError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}
