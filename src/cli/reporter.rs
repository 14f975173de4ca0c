// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::engine::DebugArtifact;
use crate::geometry::{ConversionStats, Diagnostic};
use crate::verify::VerificationResult;
use colored::*;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report conversion statistics
    pub fn report_stats(stats: &ConversionStats) {
        println!("\n{}", "━".repeat(60).bright_black());
        println!("{} {}", "Converted:".bold(), stats.source.cyan());
        println!("{}", "━".repeat(60).bright_black());
        println!(
            "  {} {}",
            "Original vertices:".bright_black(),
            stats.original_vertices.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Optimized vertices:".bright_black(),
            stats.deduplicated_vertices.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Faces:".bright_black(),
            stats.faces.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Vertex reduction:".bright_black(),
            format!("{:.1}%", stats.reduction_percent).green()
        );
        println!(
            "  {} {:.6}",
            "Volume:".bright_black(),
            stats.volume
        );
        println!(
            "  {} {:.6}",
            "Surface area:".bright_black(),
            stats.surface_area
        );
        println!(
            "  {} [{:.3}, {:.3}, {:.3}] - [{:.3}, {:.3}, {:.3}]",
            "BBox:".bright_black(),
            stats.bbox.min.x,
            stats.bbox.min.y,
            stats.bbox.min.z,
            stats.bbox.max.x,
            stats.bbox.max.y,
            stats.bbox.max.z
        );
        println!("{}", "━".repeat(60).bright_black());
    }

    /// Report topology diagnostics as warnings
    pub fn report_diagnostics(diagnostics: &[Diagnostic]) {
        if diagnostics.is_empty() {
            return;
        }
        println!(
            "\n{} {} topology {} found:",
            "⚠️".yellow(),
            diagnostics.len().to_string().yellow().bold(),
            if diagnostics.len() == 1 {
                "defect"
            } else {
                "defects"
            }
        );
        for diagnostic in diagnostics {
            println!("  {} {}", "warning:".yellow(), diagnostic);
        }
    }

    /// Report how the debug artifact generation went
    pub fn report_artifacts(artifacts: &[DebugArtifact]) {
        for artifact in artifacts {
            if artifact.outcome.is_success() {
                println!(
                    "{} {} {}",
                    "✅".green(),
                    artifact.name,
                    artifact.path.display().to_string().bright_black()
                );
            } else {
                println!(
                    "{} {} {}",
                    "⚠️".yellow(),
                    artifact.name.yellow(),
                    artifact.outcome
                );
            }
        }
    }

    /// Report verification result
    pub fn report_verification(result: &VerificationResult) {
        let status = if result.passed {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        println!("\n{} {}", "Verification".bold(), status);

        Self::print_metric("Volume", &result.volume);
        Self::print_metric("Surface area", &result.surface_area);
        Self::print_metric("Width", &result.width);
        Self::print_metric("Height", &result.height);
        Self::print_metric("Depth", &result.depth);

        let counts = if result.vertex_count_match && result.face_count_match {
            "vertex/face counts match".green()
        } else {
            "vertex/face counts differ".red()
        };
        println!("  {}", counts);
    }

    fn print_metric(name: &str, metric: &crate::verify::MetricComparison) {
        let delta = format!("{:+.2}%", metric.difference_percent);
        let delta = if metric.passed {
            delta.green()
        } else {
            delta.red()
        };
        println!(
            "  {} {:.4} vs {:.4} ({})",
            format!("{}:", name).bright_black(),
            metric.source,
            metric.converted,
            delta
        );
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}
