// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Topology validation
//!
//! Detects non-manifold edges, degenerate faces, and orphan vertices.
//! Defects never abort a conversion; they are collected as diagnostics and
//! surfaced to the caller next to the emitted output.

use super::Mesh;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Faces with an area below this are flagged as degenerate.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

/// A single topology defect found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    /// An undirected edge shared by more than two faces.
    NonManifoldEdge { edge: (usize, usize), face_count: usize },
    /// A face with repeated indices or near-zero area.
    DegenerateFace { face: usize },
    /// A vertex never referenced by any face.
    OrphanVertex { vertex: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NonManifoldEdge { edge, face_count } => write!(
                f,
                "non-manifold edge ({}, {}) shared by {} faces",
                edge.0, edge.1, face_count
            ),
            Diagnostic::DegenerateFace { face } => {
                write!(f, "degenerate face #{}", face)
            }
            Diagnostic::OrphanVertex { vertex } => {
                write!(f, "orphan vertex #{}", vertex)
            }
        }
    }
}

/// Validate mesh topology and return every defect found.
///
/// Diagnostics come out in a deterministic order: degenerate faces by face
/// index, then non-manifold edges by vertex pair, then orphan vertices by
/// index.
pub fn validate(mesh: &Mesh) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    // Degenerate faces: repeated index or vanishing area.
    for (i, face) in mesh.faces.iter().enumerate() {
        if !face.is_proper() || mesh.face_area(face) < DEGENERATE_AREA_EPSILON {
            diagnostics.push(Diagnostic::DegenerateFace { face: i });
        }
    }

    // Non-manifold edges: an undirected edge on more than two faces.
    let mut edge_count: AHashMap<(usize, usize), usize> = AHashMap::new();
    for face in &mesh.faces {
        for edge in face.edges() {
            *edge_count.entry(edge).or_insert(0) += 1;
        }
    }
    let mut non_manifold: Vec<((usize, usize), usize)> = edge_count
        .into_iter()
        .filter(|&(_, count)| count > 2)
        .collect();
    non_manifold.sort_unstable();
    for (edge, face_count) in non_manifold {
        diagnostics.push(Diagnostic::NonManifoldEdge { edge, face_count });
    }

    // Orphan vertices.
    let mut referenced = vec![false; mesh.vertex_count()];
    for face in &mesh.faces {
        for &i in &face.indices {
            referenced[i] = true;
        }
    }
    for (i, seen) in referenced.iter().enumerate() {
        if !seen {
            diagnostics.push(Diagnostic::OrphanVertex { vertex: i });
        }
    }

    diagnostics
}

/// A mesh is closed (watertight) when every edge borders exactly two faces.
pub fn is_closed(mesh: &Mesh) -> bool {
    let mut edge_count: AHashMap<(usize, usize), usize> = AHashMap::new();
    for face in &mesh.faces {
        for edge in face.edges() {
            *edge_count.entry(edge).or_insert(0) += 1;
        }
    }
    !mesh.is_empty() && edge_count.values().all(|&count| count == 2)
}
