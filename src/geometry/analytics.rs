// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion statistics
//!
//! Derived, read-only numbers about a finished conversion: vertex counts
//! before and after welding, face count, reduction percentage, volume,
//! surface area, and the bounding box.

use super::{BoundingBox, Mesh};
use serde::{Deserialize, Serialize};

/// Statistics computed once from the finalized mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Source file name (not the full path).
    pub source: String,
    pub original_vertices: usize,
    pub deduplicated_vertices: usize,
    pub faces: usize,
    /// Percentage of vertices removed by welding.
    pub reduction_percent: f64,
    /// Signed-tetrahedron volume; only meaningful for a closed,
    /// consistently wound mesh, reported as-is otherwise.
    pub volume: f64,
    pub surface_area: f64,
    pub bbox: BoundingBox,
}

impl ConversionStats {
    /// Compute statistics from a welded mesh.
    pub fn from_mesh(mesh: &Mesh, original_vertices: usize, source: impl Into<String>) -> Self {
        let deduplicated_vertices = mesh.vertex_count();
        let reduction_percent = if original_vertices == 0 {
            0.0
        } else {
            100.0 * (1.0 - deduplicated_vertices as f64 / original_vertices as f64)
        };

        Self {
            source: source.into(),
            original_vertices,
            deduplicated_vertices,
            faces: mesh.face_count(),
            reduction_percent,
            volume: volume(mesh),
            surface_area: surface_area(mesh),
            bbox: mesh.bounding_box(),
        }
    }
}

/// Mesh volume via the signed volume of origin-referenced tetrahedra.
pub fn volume(mesh: &Mesh) -> f64 {
    let mut volume = 0.0;

    for face in &mesh.faces {
        let v0 = &mesh.vertices[face.indices[0]];
        let v1 = &mesh.vertices[face.indices[1]];
        let v2 = &mesh.vertices[face.indices[2]];

        volume += v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0;
    }

    volume.abs()
}

/// Total surface area
pub fn surface_area(mesh: &Mesh) -> f64 {
    mesh.faces.iter().map(|face| mesh.face_area(face)).sum()
}
