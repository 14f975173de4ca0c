// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine subprocess invocation
//!
//! Runs the external engine under an explicit timeout and classifies the
//! result. The child process is owned by a guard that kills and reaps it
//! on every exit path, so a hung engine never outlives the call.

use super::EngineSession;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What the engine is being asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// Rasterize the script to a PNG image.
    Preview,
    /// Evaluate the script and capture `echo()` output for stats parsing.
    Analysis,
    /// Plain console-echo capture.
    Echo,
}

impl EngineMode {
    fn apply_args(&self, cmd: &mut Command, script: &Path, output: &Path) {
        cmd.arg("-o").arg(output);
        if let EngineMode::Preview = self {
            cmd.arg("--imgsize").arg("512,512");
            cmd.arg("--viewall");
            cmd.arg("--autocenter");
        }
        cmd.arg(script);
    }
}

/// Classified outcome of one engine invocation. None of these fail the
/// conversion; callers decide how loudly to report them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineOutcome {
    Success { output: PathBuf },
    Timeout { elapsed_secs: f64 },
    NonZeroExit { code: Option<i32>, stderr: String },
    EngineNotFound,
}

impl EngineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EngineOutcome::Success { .. })
    }
}

impl std::fmt::Display for EngineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineOutcome::Success { output } => {
                write!(f, "engine succeeded, output at {}", output.display())
            }
            EngineOutcome::Timeout { elapsed_secs } => {
                write!(f, "engine timed out after {:.1}s", elapsed_secs)
            }
            EngineOutcome::NonZeroExit { code, stderr } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    write!(f, "engine exited with status {}", code)
                } else {
                    write!(f, "engine exited with status {}: {}", code, stderr)
                }
            }
            EngineOutcome::EngineNotFound => write!(f, "engine executable not found"),
        }
    }
}

/// Child process owner that guarantees teardown: if the guard is dropped
/// while the child still runs (timeout, panic, early return), the child is
/// killed and reaped.
struct ProcessGuard {
    child: Child,
    finished: bool,
}

impl ProcessGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            finished: false,
        }
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Run the engine on `script`, writing its product to `output`.
///
/// Never returns an `Err` for engine-side problems: a missing binary, a
/// hang, or a non-zero exit all come back as [`EngineOutcome`] variants.
/// `Err` is reserved for local plumbing failures (e.g. the stderr pipe).
pub fn invoke_engine(
    session: &EngineSession,
    script: &Path,
    output: &Path,
    mode: EngineMode,
) -> Result<EngineOutcome> {
    let Some(binary) = session.binary() else {
        return Ok(EngineOutcome::EngineNotFound);
    };

    let mut cmd = Command::new(&binary.path);
    mode.apply_args(&mut cmd, script, output);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::piped());

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(EngineOutcome::EngineNotFound);
        }
        Err(e) => return Err(e).context("Failed to spawn engine process"),
    };

    let mut guard = ProcessGuard::new(child);
    let start = Instant::now();

    let status = loop {
        match guard
            .child
            .try_wait()
            .context("Failed to poll engine process")?
        {
            Some(status) => break status,
            None => {
                if start.elapsed() >= session.timeout() {
                    // Guard drop kills and reaps the child.
                    return Ok(EngineOutcome::Timeout {
                        elapsed_secs: start.elapsed().as_secs_f64(),
                    });
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    };
    guard.finished = true;

    let mut stderr = String::new();
    if let Some(mut pipe) = guard.child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr);
    }

    if status.success() {
        Ok(EngineOutcome::Success {
            output: output.to_path_buf(),
        })
    } else {
        Ok(EngineOutcome::NonZeroExit {
            code: status.code(),
            stderr,
        })
    }
}
