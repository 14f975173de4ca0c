// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! stl2scad
//!
//! Converts triangulated STL surface meshes into OpenSCAD `polyhedron()`
//! scripts: parses either STL encoding, welds duplicate vertices within a
//! tolerance, validates topology, and emits a watertight solid statement.
//! An optional bridge drives an external OpenSCAD binary for side-by-side
//! debug previews and analysis capture.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod io;
pub mod pipeline;
pub mod verify;

pub use config::Config;
pub use engine::{EngineMode, EngineOutcome, EngineSession};
pub use error::ConvertError;
pub use geometry::{ConversionStats, Diagnostic, Face, Mesh};
pub use pipeline::{
    convert, convert_with_debug, request_preview, Conversion, ConvertOptions, PreviewOutcome,
};
pub use verify::{verify_conversion, VerificationResult, VerifyTolerances};
