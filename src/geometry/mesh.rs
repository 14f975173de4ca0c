// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use super::BoundingBox;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Triangular face defined by three vertex indices.
///
/// Index order encodes the winding: the outward normal follows the
/// right-hand rule over `indices[0] -> indices[1] -> indices[2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub indices: [usize; 3],
}

impl Face {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    /// True when the three indices are pairwise distinct.
    pub fn is_proper(&self) -> bool {
        let [a, b, c] = self.indices;
        a != b && b != c && a != c
    }

    /// Undirected edges of this face, smaller index first.
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        let edge = |u: usize, v: usize| if u < v { (u, v) } else { (v, u) };
        [edge(a, b), edge(b, c), edge(c, a)]
    }
}

/// Triangulated surface mesh.
///
/// Faces hold indices into the vertex sequence. The loader produces one
/// mesh per input file; only the welder mutates it, everything downstream
/// takes `&Mesh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
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

    /// Add a face
    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Area of one face via the cross-product formula.
    pub fn face_area(&self, face: &Face) -> f64 {
        let v0 = &self.vertices[face.indices[0]];
        let v1 = &self.vertices[face.indices[1]];
        let v2 = &self.vertices[face.indices[2]];
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        edge1.cross(&edge2).norm() / 2.0
    }

    /// True when every face index is in range.
    pub fn indices_in_range(&self) -> bool {
        let n = self.vertices.len();
        self.faces.iter().all(|f| f.indices.iter().all(|&i| i < n))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
