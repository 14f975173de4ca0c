// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine bridge - debug scripts and external CAD engine invocation

mod debug;
mod invoke;
mod session;

pub use debug::{
    build_analysis_script, build_debug_script, parse_analysis_echo, write_debug_artifacts,
    AnalysisReport, DebugArtifact,
};
pub use invoke::{invoke_engine, EngineMode, EngineOutcome};
pub use session::{EngineBinary, EngineSession};
