// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! stl2scad CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stl2scad::cli::{run_batch, Reporter};
use stl2scad::{
    convert, convert_with_debug, verify_conversion, Config, ConvertError, ConvertOptions,
    EngineSession, VerifyTolerances,
};

#[derive(Parser)]
#[command(name = "stl2scad")]
#[command(about = "STL to OpenSCAD polyhedron converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input STL file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output SCAD file (defaults to the input name with .scad)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Vertex deduplication tolerance
    #[arg(short, long, default_value_t = 1e-6)]
    tolerance: f64,

    /// Skip topology validation
    #[arg(long)]
    skip_validation: bool,

    /// Generate debug artifacts (comparison script, preview, analysis)
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an STL file to an OpenSCAD polyhedron script
    Convert {
        /// Input STL file
        input: PathBuf,

        /// Output SCAD file (defaults to the input name with .scad)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Vertex deduplication tolerance
        #[arg(short, long, default_value_t = 1e-6)]
        tolerance: f64,

        /// Skip topology validation
        #[arg(long)]
        skip_validation: bool,

        /// Generate debug artifacts (comparison script, preview, analysis)
        #[arg(long)]
        debug: bool,
    },

    /// Verify conversion accuracy by re-parsing the emitted script
    Verify {
        /// Input STL file
        input: PathBuf,

        /// Existing SCAD file (converts in memory when omitted)
        scad: Option<PathBuf>,

        /// Volume difference tolerance in percent
        #[arg(long, default_value_t = 1.0)]
        volume_tol: f64,

        /// Surface area difference tolerance in percent
        #[arg(long, default_value_t = 2.0)]
        area_tol: f64,

        /// Bounding box dimension difference tolerance in percent
        #[arg(long, default_value_t = 0.5)]
        bbox_tol: f64,

        /// Vertex deduplication tolerance
        #[arg(short, long, default_value_t = 1e-6)]
        tolerance: f64,
    },

    /// Convert every STL file in a directory tree
    Batch {
        /// Directory to scan for STL files
        input_dir: PathBuf,

        /// Directory for the converted scripts
        output_dir: PathBuf,

        /// Vertex deduplication tolerance
        #[arg(short, long, default_value_t = 1e-6)]
        tolerance: f64,

        /// Skip topology validation
        #[arg(long)]
        skip_validation: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            input,
            output,
            tolerance,
            skip_validation,
            debug,
        }) => convert_command(
            &input,
            output,
            tolerance,
            skip_validation,
            debug,
            cli.verbose,
        ),
        Some(Commands::Verify {
            input,
            scad,
            volume_tol,
            area_tol,
            bbox_tol,
            tolerance,
        }) => verify_command(&input, scad.as_deref(), volume_tol, area_tol, bbox_tol, tolerance),
        Some(Commands::Batch {
            input_dir,
            output_dir,
            tolerance,
            skip_validation,
        }) => batch_command(&input_dir, &output_dir, tolerance, skip_validation, cli.verbose),
        Some(Commands::Version) => {
            println!("stl2scad v{}", env!("CARGO_PKG_VERSION"));
            0
        }
        None => match cli.input {
            Some(input) => convert_command(
                &input,
                cli.output,
                cli.tolerance,
                cli.skip_validation,
                cli.debug,
                cli.verbose,
            ),
            None => {
                eprintln!("Error: Input file required");
                eprintln!("Usage: stl2scad <INPUT> [--output <OUTPUT>]");
                1
            }
        },
    }
}

fn convert_command(
    input: &Path,
    output: Option<PathBuf>,
    tolerance: f64,
    skip_validation: bool,
    debug: bool,
    verbose: bool,
) -> i32 {
    let output = output.unwrap_or_else(|| input.with_extension("scad"));

    let options = ConvertOptions {
        tolerance,
        skip_validation,
        preview: debug,
        output_path: Some(output.clone()),
    };

    if verbose {
        Reporter::report_info(&format!(
            "Converting {} -> {} (tolerance {})",
            input.display(),
            output.display(),
            tolerance
        ));
    }

    if debug {
        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                Reporter::report_error(&format!("{:#}", e));
                return 1;
            }
        };
        let session = EngineSession::discover(&config);
        if verbose {
            match session.binary() {
                Some(binary) => Reporter::report_info(&format!(
                    "Engine: {} (version {})",
                    binary.path.display(),
                    binary.version.as_deref().unwrap_or("unknown")
                )),
                None => Reporter::report_warning("Engine not found; debug artifacts limited"),
            }
        }
        if let Some(required) = &config.engine.required_version {
            if session.is_available() && !session.meets_version(required) {
                Reporter::report_warning(&format!(
                    "Engine older than required version {}; debug output may differ",
                    required
                ));
            }
        }

        match convert_with_debug(input, &options, &session) {
            Ok((conversion, artifacts)) => {
                Reporter::report_stats(&conversion.stats);
                Reporter::report_diagnostics(&conversion.diagnostics);
                Reporter::report_artifacts(&artifacts);
                Reporter::success(&format!("Wrote {}", output.display()));
                0
            }
            Err(e) => {
                Reporter::report_error(&format!("{:#}", e));
                1
            }
        }
    } else {
        match convert(input, &options) {
            Ok(conversion) => {
                Reporter::report_stats(&conversion.stats);
                Reporter::report_diagnostics(&conversion.diagnostics);
                Reporter::success(&format!("Wrote {}", output.display()));
                0
            }
            Err(e) => {
                report_convert_error(&e);
                1
            }
        }
    }
}

fn verify_command(
    input: &Path,
    scad: Option<&Path>,
    volume_tol: f64,
    area_tol: f64,
    bbox_tol: f64,
    tolerance: f64,
) -> i32 {
    let options = ConvertOptions {
        tolerance,
        ..ConvertOptions::default()
    };
    let tolerances = VerifyTolerances {
        volume_percent: volume_tol,
        area_percent: area_tol,
        bbox_percent: bbox_tol,
    };

    match verify_conversion(input, scad, &options, &tolerances) {
        Ok(result) => {
            Reporter::report_verification(&result);

            let report_dir = scad
                .and_then(Path::parent)
                .or_else(|| input.parent())
                .unwrap_or_else(|| Path::new("."));
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "input".to_string());
            let report_path = report_dir.join(format!("{}_verification.json", stem));

            if let Err(e) = result.save_report(&report_path) {
                Reporter::report_warning(&format!("{:#}", e));
            } else {
                Reporter::report_info(&format!("Report saved to {}", report_path.display()));
            }

            if result.passed {
                0
            } else {
                2
            }
        }
        Err(e) => {
            Reporter::report_error(&format!("{:#}", e));
            1
        }
    }
}

fn batch_command(
    input_dir: &Path,
    output_dir: &Path,
    tolerance: f64,
    skip_validation: bool,
    verbose: bool,
) -> i32 {
    let options = ConvertOptions {
        tolerance,
        skip_validation,
        ..ConvertOptions::default()
    };

    match run_batch(input_dir, output_dir, &options) {
        Ok(summary) => {
            println!(
                "\nBatch complete: {} total, {} converted, {} failed",
                summary.total, summary.converted, summary.failed
            );
            if verbose {
                for report in &summary.results {
                    if let Some(error) = &report.error {
                        Reporter::report_warning(&format!(
                            "{}: {}",
                            report.input.display(),
                            error
                        ));
                    }
                }
            }
            Reporter::report_info(&format!(
                "Summary written to {}",
                output_dir.join("batch_summary.json").display()
            ));
            if summary.failed == 0 {
                0
            } else {
                2
            }
        }
        Err(e) => {
            Reporter::report_error(&format!("{:#}", e));
            1
        }
    }
}

fn report_convert_error(error: &ConvertError) {
    match error {
        ConvertError::Format { .. } => {
            Reporter::report_error(&format!("Invalid STL file - {}", error));
        }
        ConvertError::EmptyMesh { .. } => {
            Reporter::report_error(&format!("Empty mesh - {}", error));
        }
        ConvertError::Tolerance(_) => {
            Reporter::report_error(&error.to_string());
        }
        ConvertError::Io { .. } | ConvertError::Output { .. } => {
            Reporter::report_error(&error.to_string());
        }
    }
}
