// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared STL fixtures for integration tests

// Each test binary compiles this module separately and uses a subset.
#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// Corner coordinates of an axis-aligned cube at the origin.
pub fn cube_corners(side: f32) -> [[f32; 3]; 8] {
    let s = side;
    [
        [0.0, 0.0, 0.0],
        [s, 0.0, 0.0],
        [s, s, 0.0],
        [0.0, s, 0.0],
        [0.0, 0.0, s],
        [s, 0.0, s],
        [s, s, s],
        [0.0, s, s],
    ]
}

/// Cube triangulation wound outward.
pub const CUBE_FACES: [[usize; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [3, 6, 2],
    [3, 7, 6],
    [0, 4, 7],
    [0, 7, 3],
    [1, 2, 6],
    [1, 6, 5],
];

/// Expand indexed triangles into per-triangle vertex triples, the way STL
/// stores them.
pub fn cube_triangles(side: f32) -> Vec<[[f32; 3]; 3]> {
    let corners = cube_corners(side);
    CUBE_FACES
        .iter()
        .map(|face| [corners[face[0]], corners[face[1]], corners[face[2]]])
        .collect()
}

/// Serialize triangles as a binary STL byte stream.
pub fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for triangle in triangles {
        bytes.extend_from_slice(&[0u8; 12]); // normal, recomputed by consumers
        for vertex in triangle {
            for coord in vertex {
                bytes.extend_from_slice(&coord.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&[0u8; 2]); // attribute byte count
    }
    bytes
}

/// Serialize triangles as an ASCII STL document.
pub fn ascii_stl(triangles: &[[[f32; 3]; 3]]) -> String {
    let mut out = String::from("solid fixture\n");
    for triangle in triangles {
        out.push_str("  facet normal 0 0 0\n    outer loop\n");
        for vertex in triangle {
            out.push_str(&format!(
                "      vertex {} {} {}\n",
                vertex[0], vertex[1], vertex[2]
            ));
        }
        out.push_str("    endloop\n  endfacet\n");
    }
    out.push_str("endsolid fixture\n");
    out
}

/// Write bytes to a named temp file with an .stl suffix.
pub fn write_stl(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".stl")
        .tempfile()
        .expect("create temp STL");
    file.write_all(bytes).expect("write temp STL");
    file.flush().expect("flush temp STL");
    file
}
