// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end conversion tests

mod common;

use approx::assert_relative_eq;
use common::{ascii_stl, binary_stl, cube_triangles, write_stl};
use stl2scad::{convert, ConvertError, ConvertOptions, Diagnostic};

#[test]
fn test_cube_fixture_statistics() {
    // The recorded debug fixture: a cube of side 20 stored as 12
    // independent triangles (36 raw vertices).
    let file = write_stl(&binary_stl(&cube_triangles(20.0)));

    let result = convert(file.path(), &ConvertOptions::default()).unwrap();

    assert_eq!(result.stats.original_vertices, 36);
    assert_eq!(result.stats.deduplicated_vertices, 8);
    assert_eq!(result.stats.faces, 12);
    assert_relative_eq!(result.stats.reduction_percent, 77.8, epsilon = 0.05);
    assert_relative_eq!(result.stats.volume, 8000.0, epsilon = 1e-6);
    assert_relative_eq!(result.stats.surface_area, 2400.0, epsilon = 1e-6);

    let bbox = &result.stats.bbox;
    assert_relative_eq!(bbox.min.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.max.z, 20.0, epsilon = 1e-9);

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_unit_cube_volume() {
    let file = write_stl(&binary_stl(&cube_triangles(1.0)));
    let result = convert(file.path(), &ConvertOptions::default()).unwrap();
    assert_relative_eq!(result.stats.volume, 1.0, epsilon = 1e-6);
    assert_relative_eq!(result.stats.bbox.max.x, 1.0, epsilon = 1e-9);
}

#[test]
fn test_binary_and_ascii_produce_identical_output() {
    let triangles = cube_triangles(20.0);
    let binary = write_stl(&binary_stl(&triangles));
    let ascii = write_stl(ascii_stl(&triangles).as_bytes());

    let from_binary = convert(binary.path(), &ConvertOptions::default()).unwrap();
    let from_ascii = convert(ascii.path(), &ConvertOptions::default()).unwrap();

    // Everything after the source-name header line must match exactly.
    let body = |scad: &str| {
        scad.lines()
            .filter(|line| !line.starts_with("// source:"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(body(&from_binary.scad), body(&from_ascii.scad));
}

#[test]
fn test_non_manifold_edge_diagnostic() {
    // Three triangles hanging off the same edge.
    let fin = [
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
    ];
    let file = write_stl(&binary_stl(&fin));

    let result = convert(file.path(), &ConvertOptions::default()).unwrap();

    let non_manifold: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::NonManifoldEdge { .. }))
        .collect();
    assert_eq!(non_manifold.len(), 1);
    assert_eq!(
        non_manifold[0],
        &Diagnostic::NonManifoldEdge {
            edge: (0, 1),
            face_count: 3
        }
    );

    // Defects never block emission.
    assert!(result.scad.contains("polyhedron("));
}

#[test]
fn test_skip_validation_suppresses_diagnostics() {
    let fin = [
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
    ];
    let file = write_stl(&binary_stl(&fin));

    let options = ConvertOptions {
        skip_validation: true,
        ..ConvertOptions::default()
    };
    let result = convert(file.path(), &options).unwrap();
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_output_file_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cube.scad");
    let file = write_stl(&binary_stl(&cube_triangles(20.0)));

    let options = ConvertOptions {
        output_path: Some(output.clone()),
        ..ConvertOptions::default()
    };
    let result = convert(file.path(), &options).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, result.scad);
}

#[test]
fn test_no_partial_output_on_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("broken.scad");
    let file = write_stl(b"this is not an stl file");

    let options = ConvertOptions {
        output_path: Some(output.clone()),
        ..ConvertOptions::default()
    };
    let result = convert(file.path(), &options);

    assert!(matches!(result, Err(ConvertError::Format { .. })));
    assert!(!output.exists(), "partial output must not be written");
}

#[test]
fn test_negative_tolerance_rejected() {
    let file = write_stl(&binary_stl(&cube_triangles(1.0)));
    let options = ConvertOptions {
        tolerance: -0.5,
        ..ConvertOptions::default()
    };
    assert!(matches!(
        convert(file.path(), &options),
        Err(ConvertError::Tolerance(_))
    ));
}

#[test]
fn test_zero_tolerance_still_welds_exact_duplicates() {
    let file = write_stl(&binary_stl(&cube_triangles(20.0)));
    let options = ConvertOptions {
        tolerance: 0.0,
        ..ConvertOptions::default()
    };
    let result = convert(file.path(), &options).unwrap();
    assert_eq!(result.stats.deduplicated_vertices, 8);
    assert_eq!(result.stats.faces, 12);
}

#[test]
fn test_empty_stl_rejected() {
    let file = write_stl(&binary_stl(&[]));
    assert!(matches!(
        convert(file.path(), &ConvertOptions::default()),
        Err(ConvertError::EmptyMesh { .. })
    ));
}

#[test]
fn test_orphan_vertices_impossible_after_load() {
    // The loader only creates vertices from triangle records, so a fresh
    // conversion of a well-formed file cannot produce orphans.
    let file = write_stl(&binary_stl(&cube_triangles(5.0)));
    let result = convert(file.path(), &ConvertOptions::default()).unwrap();
    assert!(!result
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::OrphanVertex { .. })));
}
