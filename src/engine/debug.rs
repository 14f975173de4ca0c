// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Debug comparison scripts and analysis parsing
//!
//! Builds the side-by-side comparison script (original import next to the
//! converted polyhedron), the echo-based analysis script, and parses the
//! engine's console capture back into numbers.

use super::{invoke_engine, EngineMode, EngineOutcome, EngineSession};
use crate::geometry::ConversionStats;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Build a script that shows the original import and the converted solid
/// side by side, with `echo()` statements reporting the conversion stats
/// on the engine console.
pub fn build_debug_script(
    original_path: &Path,
    emitted: &str,
    stats: &ConversionStats,
) -> String {
    let mut out = String::with_capacity(emitted.len() + 512);

    out.push_str("// stl2scad debug comparison\n");
    out.push_str("// left: original import, right: converted polyhedron\n\n");

    let _ = writeln!(out, "echo(\"debug_info: source={}\");", stats.source);
    let _ = writeln!(
        out,
        "echo(\"debug_info: original_vertices={}\");",
        stats.original_vertices
    );
    let _ = writeln!(
        out,
        "echo(\"debug_info: deduplicated_vertices={}\");",
        stats.deduplicated_vertices
    );
    let _ = writeln!(out, "echo(\"debug_info: faces={}\");", stats.faces);
    let _ = writeln!(
        out,
        "echo(\"debug_info: reduction_percent={:.1}\");",
        stats.reduction_percent
    );
    let _ = writeln!(out, "echo(\"debug_info: volume={:.6}\");", stats.volume);
    out.push('\n');

    let _ = writeln!(out, "import(\"{}\");", script_path_literal(original_path));
    out.push('\n');

    let _ = writeln!(out, "translate([{:.6}, 0, 0]) {{", comparison_offset(stats));
    out.push_str(emitted);
    out.push_str("}\n");

    out
}

/// Build a script that evaluates the converted solid and echoes the
/// converter's statistics as parseable markers. A successful run proves
/// the engine accepted the emitted geometry; the echoed values come back
/// through [`parse_analysis_echo`].
pub fn build_analysis_script(emitted: &str, stats: &ConversionStats) -> String {
    let mut out = String::with_capacity(emitted.len() + 256);
    out.push_str(emitted);
    out.push('\n');
    let _ = writeln!(out, "echo(\"VOLUME=\", {:.6});", stats.volume);
    let _ = writeln!(out, "echo(\"AREA=\", {:.6});", stats.surface_area);
    let _ = writeln!(
        out,
        "echo(\"BBOX_MIN=\", [{:.6}, {:.6}, {:.6}]);",
        stats.bbox.min.x, stats.bbox.min.y, stats.bbox.min.z
    );
    let _ = writeln!(
        out,
        "echo(\"BBOX_MAX=\", [{:.6}, {:.6}, {:.6}]);",
        stats.bbox.max.x, stats.bbox.max.y, stats.bbox.max.z
    );
    out
}

/// Shift the converted solid sideways so both solids are visible at once.
fn comparison_offset(stats: &ConversionStats) -> f64 {
    let width = stats.bbox.size().x;
    if width.is_finite() && width > 0.0 {
        width * 1.25
    } else {
        10.0
    }
}

/// Engine import() wants forward slashes, even on Windows.
fn script_path_literal(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// Statistics parsed back from the engine's echo capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub volume: Option<f64>,
    pub surface_area: Option<f64>,
    pub bbox_min: Option<[f64; 3]>,
    pub bbox_max: Option<[f64; 3]>,
}

impl AnalysisReport {
    pub fn is_complete(&self) -> bool {
        self.volume.is_some()
            && self.surface_area.is_some()
            && self.bbox_min.is_some()
            && self.bbox_max.is_some()
    }
}

/// Parse an engine console capture. Lines look like
/// `ECHO: "VOLUME=", 8000` or `ECHO: "BBOX_MIN=", [0, 0, 0]`.
pub fn parse_analysis_echo(text: &str) -> AnalysisReport {
    let mut report = AnalysisReport::default();

    for line in text.lines() {
        if let Some(value) = marker_value(line, "VOLUME=") {
            report.volume = value.parse().ok();
        } else if let Some(value) = marker_value(line, "AREA=") {
            report.surface_area = value.parse().ok();
        } else if let Some(value) = marker_value(line, "BBOX_MIN=") {
            report.bbox_min = parse_triple(value);
        } else if let Some(value) = marker_value(line, "BBOX_MAX=") {
            report.bbox_max = parse_triple(value);
        }
    }

    report
}

/// Extract the payload following a quoted marker on an ECHO line.
fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let pos = line.find(marker)?;
    let rest = &line[pos + marker.len()..];
    Some(rest.trim_start_matches('"').trim_start_matches(',').trim())
}

fn parse_triple(value: &str) -> Option<[f64; 3]> {
    let inner = value.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut coords = inner.split(',').map(|c| c.trim().parse::<f64>());
    let x = coords.next()?.ok()?;
    let y = coords.next()?.ok()?;
    let z = coords.next()?.ok()?;
    if coords.next().is_some() {
        return None;
    }
    Some([x, y, z])
}

/// One generated debug artifact and how its generation went.
#[derive(Debug)]
pub struct DebugArtifact {
    pub name: &'static str,
    pub path: PathBuf,
    pub outcome: EngineOutcome,
}

/// Generate the debug artifact set next to `output_path`: the comparison
/// script (no engine needed), a rendered preview, a console capture, and
/// a JSON analysis report. Engine trouble is recorded per artifact, never
/// escalated; conversion success must not depend on the engine.
pub fn write_debug_artifacts(
    output_path: &Path,
    original_path: &Path,
    emitted: &str,
    stats: &ConversionStats,
    session: &EngineSession,
) -> Result<Vec<DebugArtifact>> {
    let dir = output_path.parent().unwrap_or_else(|| Path::new("."));
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    let mut artifacts = Vec::new();

    // The comparison script itself needs no engine.
    let debug_scad = dir.join(format!("{}_debug.scad", stem));
    let script = build_debug_script(original_path, emitted, stats);
    std::fs::write(&debug_scad, &script)
        .with_context(|| format!("Failed to write {}", debug_scad.display()))?;
    artifacts.push(DebugArtifact {
        name: "debug script",
        path: debug_scad.clone(),
        outcome: EngineOutcome::Success {
            output: debug_scad.clone(),
        },
    });

    // Rendered side-by-side preview.
    let preview = dir.join(format!("{}_preview.png", stem));
    let outcome = invoke_engine(session, &debug_scad, &preview, EngineMode::Preview)?;
    artifacts.push(DebugArtifact {
        name: "preview image",
        path: preview,
        outcome,
    });

    // Console capture of the debug_info echoes.
    let echo = dir.join(format!("{}_debug.echo", stem));
    let outcome = invoke_engine(session, &debug_scad, &echo, EngineMode::Echo)?;
    artifacts.push(DebugArtifact {
        name: "echo capture",
        path: echo,
        outcome,
    });

    // Analysis: run the marker script in a scratch dir, parse the capture,
    // persist it as JSON.
    let analysis_json = dir.join(format!("{}_analysis.json", stem));
    let outcome = run_analysis(&analysis_json, emitted, stats, session)?;
    artifacts.push(DebugArtifact {
        name: "analysis report",
        path: analysis_json,
        outcome,
    });

    Ok(artifacts)
}

fn run_analysis(
    analysis_json: &Path,
    emitted: &str,
    stats: &ConversionStats,
    session: &EngineSession,
) -> Result<EngineOutcome> {
    let scratch = tempfile::tempdir().context("Failed to create analysis scratch directory")?;
    let script_path = scratch.path().join("analysis.scad");
    let capture_path = scratch.path().join("analysis.echo");

    std::fs::write(&script_path, build_analysis_script(emitted, stats))
        .context("Failed to write analysis script")?;

    let outcome = invoke_engine(session, &script_path, &capture_path, EngineMode::Analysis)?;
    if !outcome.is_success() {
        return Ok(outcome);
    }

    let capture = std::fs::read_to_string(&capture_path)
        .with_context(|| format!("Failed to read engine capture {}", capture_path.display()))?;
    let report = parse_analysis_echo(&capture);

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize analysis")?;
    std::fs::write(analysis_json, json)
        .with_context(|| format!("Failed to write {}", analysis_json.display()))?;

    Ok(EngineOutcome::Success {
        output: analysis_json.to_path_buf(),
    })
}
