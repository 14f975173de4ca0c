// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion verification
//!
//! Re-parses the emitted polyhedron script and compares its geometry
//! against the source mesh: vertex/face counts must match exactly, while
//! volume, surface area, and bounding-box dimensions must agree within
//! percentage tolerances.

use crate::geometry::{self, Mesh};
use crate::io;
use crate::pipeline::{convert, ConvertOptions, Conversion};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Percentage tolerances for the metric comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTolerances {
    pub volume_percent: f64,
    pub area_percent: f64,
    pub bbox_percent: f64,
}

impl Default for VerifyTolerances {
    fn default() -> Self {
        Self {
            volume_percent: 1.0,
            area_percent: 2.0,
            bbox_percent: 0.5,
        }
    }
}

/// One compared metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricComparison {
    pub source: f64,
    pub converted: f64,
    pub difference: f64,
    pub difference_percent: f64,
    pub passed: bool,
}

impl MetricComparison {
    fn new(source: f64, converted: f64, tolerance_percent: f64) -> Self {
        let difference = converted - source;
        let difference_percent = if source.abs() > f64::EPSILON {
            100.0 * difference / source
        } else if converted.abs() > f64::EPSILON {
            100.0
        } else {
            0.0
        };
        Self {
            source,
            converted,
            difference,
            difference_percent,
            passed: difference_percent.abs() <= tolerance_percent,
        }
    }
}

/// Full verification report, serializable as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub stl_file: PathBuf,
    pub timestamp: String,
    pub tolerances: VerifyTolerances,
    pub vertex_count_match: bool,
    pub face_count_match: bool,
    pub volume: MetricComparison,
    pub surface_area: MetricComparison,
    pub width: MetricComparison,
    pub height: MetricComparison,
    pub depth: MetricComparison,
    pub passed: bool,
}

impl VerificationResult {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize verification result")
    }

    pub fn save_report(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write verification report {}", path.display()))
    }
}

/// Verify a conversion end to end.
///
/// When `scad` is given, that script is verified; otherwise the STL is
/// converted in memory first. Either way the emitted text goes back
/// through the polyhedron parser, so what is checked is the actual output
/// format, not the in-memory mesh.
pub fn verify_conversion(
    stl_path: &Path,
    scad: Option<&Path>,
    options: &ConvertOptions,
    tolerances: &VerifyTolerances,
) -> Result<VerificationResult> {
    let mut core_options = options.clone();
    core_options.output_path = None;
    let conversion = convert(stl_path, &core_options)
        .with_context(|| format!("Failed to convert {}", stl_path.display()))?;

    let emitted = match scad {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SCAD file {}", path.display()))?,
        None => conversion.scad.clone(),
    };

    let parsed = io::parse_polyhedron(&emitted)
        .context("Emitted script does not parse back into a mesh")?;

    Ok(compare(stl_path, &conversion, &parsed, tolerances))
}

fn compare(
    stl_path: &Path,
    conversion: &Conversion,
    parsed: &Mesh,
    tolerances: &VerifyTolerances,
) -> VerificationResult {
    let source = &conversion.mesh;

    let vertex_count_match = source.vertex_count() == parsed.vertex_count();
    let face_count_match = source.face_count() == parsed.face_count();

    let volume = MetricComparison::new(
        geometry::volume(source),
        geometry::volume(parsed),
        tolerances.volume_percent,
    );
    let surface_area = MetricComparison::new(
        geometry::surface_area(source),
        geometry::surface_area(parsed),
        tolerances.area_percent,
    );

    let source_size = source.bounding_box().size();
    let parsed_size = parsed.bounding_box().size();
    let width = MetricComparison::new(source_size.x, parsed_size.x, tolerances.bbox_percent);
    let height = MetricComparison::new(source_size.y, parsed_size.y, tolerances.bbox_percent);
    let depth = MetricComparison::new(source_size.z, parsed_size.z, tolerances.bbox_percent);

    let passed = vertex_count_match
        && face_count_match
        && volume.passed
        && surface_area.passed
        && width.passed
        && height.passed
        && depth.passed;

    VerificationResult {
        stl_file: stl_path.to_path_buf(),
        timestamp: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        tolerances: tolerances.clone(),
        vertex_count_match,
        face_count_match,
        volume,
        surface_area,
        width,
        height,
        depth,
        passed,
    }
}
