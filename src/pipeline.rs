// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion pipeline
//!
//! The synchronous load -> weld -> validate -> emit pipeline behind both
//! the CLI and the GUI contract. Ownership of the mesh moves strictly in
//! pipeline order; nothing here touches the external engine except the
//! explicitly engine-backed entry points at the bottom.

use crate::engine::{
    invoke_engine, write_debug_artifacts, DebugArtifact, EngineMode, EngineOutcome, EngineSession,
};
use crate::error::ConvertError;
use crate::geometry::{deduplicate, validate, ConversionStats, Diagnostic, Mesh};
use crate::io;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Explicit conversion configuration.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Vertex deduplication tolerance (Euclidean distance).
    pub tolerance: f64,
    /// Skip topology validation; diagnostics come back empty.
    pub skip_validation: bool,
    /// Generate debug artifacts next to the output (CLI/GUI decide).
    pub preview: bool,
    /// Where to write the emitted script; `None` keeps it in memory.
    pub output_path: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            skip_validation: false,
            preview: false,
            output_path: None,
        }
    }
}

/// A finished conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The emitted OpenSCAD script.
    pub scad: String,
    pub stats: ConversionStats,
    pub diagnostics: Vec<Diagnostic>,
    /// The welded mesh the script was emitted from.
    pub mesh: Mesh,
}

/// Convert an STL file to an OpenSCAD polyhedron script.
///
/// Fatal problems (unreadable input, unrecognized format, empty mesh, bad
/// tolerance) abort with no partial output written. Topology defects do
/// not: they accumulate as diagnostics next to a best-effort result.
pub fn convert(path: &Path, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let mut mesh = io::load(path)?;
    let original_vertices = mesh.vertex_count();

    deduplicate(&mut mesh, options.tolerance)?;

    let diagnostics = if options.skip_validation {
        Vec::new()
    } else {
        validate(&mesh)
    };

    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let stats = ConversionStats::from_mesh(&mesh, original_vertices, source_name);

    let scad = io::emit(&mesh, &stats);

    if let Some(output_path) = &options.output_path {
        std::fs::write(output_path, &scad).map_err(|source| ConvertError::Output {
            path: output_path.clone(),
            source,
        })?;
    }

    Ok(Conversion {
        scad,
        stats,
        diagnostics,
        mesh,
    })
}

/// Convert and, when `options.preview` is set, generate the debug artifact
/// set through the given engine session. Engine trouble is reported per
/// artifact and never fails the conversion.
pub fn convert_with_debug(
    path: &Path,
    options: &ConvertOptions,
    session: &EngineSession,
) -> Result<(Conversion, Vec<DebugArtifact>)> {
    let conversion = convert(path, options)?;

    let artifacts = if options.preview {
        let output_path = options
            .output_path
            .clone()
            .unwrap_or_else(|| path.with_extension("scad"));
        write_debug_artifacts(&output_path, path, &conversion.scad, &conversion.stats, session)?
    } else {
        Vec::new()
    };

    Ok((conversion, artifacts))
}

/// Outcome of a preview request.
#[derive(Debug)]
pub enum PreviewOutcome {
    /// Decoded PNG bytes of the rendered model.
    Image(Vec<u8>),
    /// The engine could not produce an image; the classified outcome.
    Engine(EngineOutcome),
}

/// Render a preview image of the converted model (GUI contract).
///
/// Converts in memory, hands the script to the engine in preview mode,
/// and returns the PNG bytes on success. Engine absence, timeout, or
/// failure comes back as [`PreviewOutcome::Engine`].
pub fn request_preview(path: &Path, session: &EngineSession) -> Result<PreviewOutcome> {
    let conversion = convert(path, &ConvertOptions::default())
        .with_context(|| format!("Failed to convert {}", path.display()))?;

    let scratch = tempfile::tempdir().context("Failed to create preview scratch directory")?;
    let script_path = scratch.path().join("preview.scad");
    let image_path = scratch.path().join("preview.png");

    std::fs::write(&script_path, &conversion.scad).context("Failed to write preview script")?;

    let outcome = invoke_engine(session, &script_path, &image_path, EngineMode::Preview)?;
    if !outcome.is_success() {
        return Ok(PreviewOutcome::Engine(outcome));
    }

    let bytes = std::fs::read(&image_path)
        .with_context(|| format!("Failed to read preview image {}", image_path.display()))?;

    // A zero-byte or truncated file from a crashed engine is not a preview.
    image::load_from_memory(&bytes).context("Engine produced an unreadable preview image")?;

    Ok(PreviewOutcome::Image(bytes))
}
