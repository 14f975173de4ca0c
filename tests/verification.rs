// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Verification tests: emitted output re-checked against the source mesh

mod common;

use common::{binary_stl, cube_triangles, write_stl};
use stl2scad::{convert, verify_conversion, ConvertOptions, VerifyTolerances};

#[test]
fn test_fresh_conversion_verifies() {
    let file = write_stl(&binary_stl(&cube_triangles(20.0)));

    let result = verify_conversion(
        file.path(),
        None,
        &ConvertOptions::default(),
        &VerifyTolerances::default(),
    )
    .unwrap();

    assert!(result.passed, "{:?}", result);
    assert!(result.vertex_count_match);
    assert!(result.face_count_match);
    assert!(result.volume.passed);
    assert!(result.surface_area.passed);
}

#[test]
fn test_verify_existing_scad_file() {
    let dir = tempfile::tempdir().unwrap();
    let scad_path = dir.path().join("cube.scad");
    let file = write_stl(&binary_stl(&cube_triangles(20.0)));

    let options = ConvertOptions {
        output_path: Some(scad_path.clone()),
        ..ConvertOptions::default()
    };
    convert(file.path(), &options).unwrap();

    let result = verify_conversion(
        file.path(),
        Some(&scad_path),
        &ConvertOptions::default(),
        &VerifyTolerances::default(),
    )
    .unwrap();
    assert!(result.passed);
}

#[test]
fn test_verify_detects_mismatched_scad() {
    // A SCAD file for a different solid must fail verification.
    let dir = tempfile::tempdir().unwrap();
    let scad_path = dir.path().join("other.scad");
    let other = write_stl(&binary_stl(&cube_triangles(5.0)));
    let options = ConvertOptions {
        output_path: Some(scad_path.clone()),
        ..ConvertOptions::default()
    };
    convert(other.path(), &options).unwrap();

    let file = write_stl(&binary_stl(&cube_triangles(20.0)));
    let result = verify_conversion(
        file.path(),
        Some(&scad_path),
        &ConvertOptions::default(),
        &VerifyTolerances::default(),
    )
    .unwrap();

    assert!(!result.passed);
    assert!(!result.volume.passed);
}

#[test]
fn test_report_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("cube_verification.json");
    let file = write_stl(&binary_stl(&cube_triangles(20.0)));

    let result = verify_conversion(
        file.path(),
        None,
        &ConvertOptions::default(),
        &VerifyTolerances::default(),
    )
    .unwrap();

    result.save_report(&report_path).unwrap();
    let text = std::fs::read_to_string(&report_path).unwrap();
    let back: stl2scad::VerificationResult = serde_json::from_str(&text).unwrap();
    assert_eq!(back.passed, result.passed);
    assert_eq!(back.volume.source, result.volume.source);
}
