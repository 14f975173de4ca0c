// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Fatal error taxonomy for the conversion pipeline.
//!
//! These are the errors that abort a conversion before any partial output is
//! written (spec.md §7): unparseable input (`Format`), empty meshes
//! (`EmptyMesh`), invalid tolerances (`Tolerance`), and I/O failures (`Io`,
//! `Output`). Non-fatal conditions are reported as [`crate::Diagnostic`]s or
//! engine outcomes instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal conversion errors. Any of these aborts the pipeline with no partial
/// file written.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input could not be parsed as either STL encoding.
    #[error("failed to parse {path}: {reason}")]
    Format {
        /// Path of the offending input file.
        path: PathBuf,
        /// Human-readable reason the input was rejected.
        reason: String,
    },

    /// The input parsed but contained zero triangles.
    #[error("no triangles found in {path}")]
    EmptyMesh {
        /// Path of the empty input file.
        path: PathBuf,
    },

    /// A non-positive tolerance was supplied where a positive value is required.
    #[error("invalid tolerance: {0}")]
    Tolerance(f64),

    /// The input file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write {path}")]
    Output {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Build a [`ConvertError::Format`] for `path` with the given `reason`.
    pub fn format(path: &Path, reason: impl Into<String>) -> Self {
        ConvertError::Format {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
