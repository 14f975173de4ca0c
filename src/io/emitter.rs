// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! OpenSCAD polyhedron emitter
//!
//! Serializes a welded mesh into a self-contained `polyhedron()` statement.
//! Coordinates are printed with six decimal places so golden-file
//! comparisons stay byte-stable; face triples keep the mesh winding.

use crate::geometry::{ConversionStats, Mesh};
use std::fmt::Write;

/// Rendering hint for non-convex solids: the maximum number of times a ray
/// may cross the boundary that the consuming engine should assume.
const CONVEXITY: u32 = 10;

/// Emit a complete OpenSCAD script for `mesh`.
///
/// The header comment block records the source file and the headline
/// statistics; the statement body is a vertex-list literal followed by a
/// face-list literal.
pub fn emit(mesh: &Mesh, stats: &ConversionStats) -> String {
    // Rough pre-size: ~40 bytes per vertex line, ~16 per face line.
    let mut out = String::with_capacity(128 + mesh.vertex_count() * 40 + mesh.face_count() * 16);

    out.push_str("// STL to SCAD conversion\n");
    let _ = writeln!(out, "// source: {}", stats.source);
    let _ = writeln!(out, "// volume: {:.6}", stats.volume);
    let _ = writeln!(
        out,
        "// bbox: [{:.6}, {:.6}, {:.6}] - [{:.6}, {:.6}, {:.6}]",
        stats.bbox.min.x,
        stats.bbox.min.y,
        stats.bbox.min.z,
        stats.bbox.max.x,
        stats.bbox.max.y,
        stats.bbox.max.z
    );
    out.push('\n');

    out.push_str("polyhedron(\n");
    out.push_str("  points=[\n");
    for vertex in &mesh.vertices {
        let _ = writeln!(
            out,
            "    [{:.6}, {:.6}, {:.6}],",
            vertex.x, vertex.y, vertex.z
        );
    }
    out.push_str("  ],\n");

    out.push_str("  faces=[\n");
    for face in &mesh.faces {
        let _ = writeln!(
            out,
            "    [{}, {}, {}],",
            face.indices[0], face.indices[1], face.indices[2]
        );
    }
    out.push_str("  ],\n");

    let _ = writeln!(out, "  convexity={}", CONVEXITY);
    out.push_str(");\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::test_fixtures::cube_mesh;

    #[test]
    fn test_emit_cube() {
        let mesh = cube_mesh(20.0);
        let stats = ConversionStats::from_mesh(&mesh, 36, "cube.stl");
        let scad = emit(&mesh, &stats);

        assert!(scad.contains("// source: cube.stl"));
        assert!(scad.contains("// volume: 8000.000000"));
        assert!(scad.contains("polyhedron("));
        assert!(scad.contains("[20.000000, 20.000000, 20.000000],"));
        assert!(scad.contains("convexity=10"));
        assert!(scad.trim_end().ends_with(");"));

        // One line per vertex and face.
        assert_eq!(scad.matches("    [").count(), 8 + 12);
    }

    #[test]
    fn test_fixed_decimal_precision() {
        let mut mesh = cube_mesh(1.0);
        mesh.vertices[0].x = 0.123456789;
        let stats = ConversionStats::from_mesh(&mesh, 8, "precise.stl");
        let scad = emit(&mesh, &stats);
        assert!(scad.contains("[0.123457, 0.000000, 0.000000],"));
    }
}
