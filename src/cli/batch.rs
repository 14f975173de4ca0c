// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch conversion over a directory tree
//!
//! Walks an input directory for STL files and converts each one,
//! mirroring the directory structure under the output root. Files are
//! independent, so the sweep fans out across a rayon pool; each
//! conversion owns its mesh exclusively.

use crate::pipeline::{convert, ConvertOptions};
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Per-file batch record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub diagnostics: usize,
    pub reduction_percent: f64,
}

/// Batch summary, also written as `batch_summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
    pub results: Vec<BatchFileReport>,
}

/// Convert every STL file under `input_dir` into `output_dir`.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<BatchSummary> {
    if !input_dir.is_dir() {
        bail!("Input directory not found: {}", input_dir.display());
    }

    let files = discover_stl_files(input_dir);
    if files.is_empty() {
        bail!("No STL files found in {}", input_dir.display());
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut results: Vec<BatchFileReport> = files
        .par_iter()
        .map(|input| {
            let report = convert_one(input, input_dir, output_dir, options);
            progress.inc(1);
            report
        })
        .collect();
    progress.finish_and_clear();

    // Parallel collection preserves input order, but sort anyway so the
    // summary is stable however the pool is configured.
    results.sort_by(|a, b| a.input.cmp(&b.input));

    let converted = results.iter().filter(|r| r.passed).count();
    let summary = BatchSummary {
        total: results.len(),
        converted,
        failed: results.len() - converted,
        results,
    };

    let summary_path = output_dir.join("batch_summary.json");
    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    Ok(summary)
}

fn discover_stl_files(input_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("stl"))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn convert_one(
    input: &Path,
    input_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> BatchFileReport {
    let relative = input.strip_prefix(input_dir).unwrap_or(input);
    let output = output_dir.join(relative).with_extension("scad");

    let mut report = BatchFileReport {
        input: input.to_path_buf(),
        output: output.clone(),
        passed: false,
        error: None,
        diagnostics: 0,
        reduction_percent: 0.0,
    };

    if let Some(parent) = output.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            report.error = Some(format!("Failed to create {}: {}", parent.display(), e));
            return report;
        }
    }

    let mut file_options = options.clone();
    file_options.output_path = Some(output);

    match convert(input, &file_options) {
        Ok(conversion) => {
            report.passed = true;
            report.diagnostics = conversion.diagnostics.len();
            report.reduction_percent = conversion.stats.reduction_percent;
        }
        Err(e) => {
            report.error = Some(e.to_string());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_fails() {
        let out = tempfile::tempdir().unwrap();
        let result = run_batch(
            Path::new("/definitely/not/a/directory"),
            out.path(),
            &ConvertOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_directory_fails() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let result = run_batch(input.path(), out.path(), &ConvertOptions::default());
        assert!(result.is_err());
    }
}
