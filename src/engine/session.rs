// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine capability probe
//!
//! Discovers the external OpenSCAD binary once and carries the result as
//! an explicit session object. Everything that talks to the engine takes
//! an [`EngineSession`] instead of re-probing or reading globals.

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// A resolved engine executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineBinary {
    pub path: PathBuf,
    /// Version string as reported by `--version`, e.g. "2021.01".
    pub version: Option<String>,
}

/// Result of the one-time engine discovery.
///
/// `binary` is `None` when no working executable was found; invocations
/// against such a session classify as `EngineNotFound` instead of failing
/// the conversion.
#[derive(Debug, Clone)]
pub struct EngineSession {
    binary: Option<EngineBinary>,
    timeout: Duration,
}

impl EngineSession {
    /// Probe for the engine using, in order: the configured path, the
    /// `OPENSCAD_PATH` environment override (already folded into the
    /// config), a PATH lookup, and platform well-known install locations.
    pub fn discover(config: &Config) -> Self {
        let timeout = config.engine_timeout();

        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = &config.engine.path {
            candidates.push(path.clone());
        }
        candidates.push(PathBuf::from("openscad"));
        candidates.extend(well_known_paths());

        for candidate in candidates {
            if let Some(version) = probe_version(&candidate) {
                return Self {
                    binary: Some(EngineBinary {
                        path: candidate,
                        version,
                    }),
                    timeout,
                };
            }
        }

        Self {
            binary: None,
            timeout,
        }
    }

    /// Session around an explicit executable, skipping discovery. The
    /// binary is trusted as-is; a bad path surfaces as `EngineNotFound`
    /// at invocation time.
    pub fn with_binary(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: Some(EngineBinary {
                path: path.into(),
                version: None,
            }),
            timeout,
        }
    }

    /// Session that deliberately has no engine.
    pub fn unavailable(timeout: Duration) -> Self {
        Self {
            binary: None,
            timeout,
        }
    }

    pub fn binary(&self) -> Option<&EngineBinary> {
        self.binary.as_ref()
    }

    pub fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Compare the probed version against a required minimum. Engine
    /// versions are date-shaped (`YYYY.MM[.DD]`), so a lexicographic
    /// comparison is sufficient. Unknown versions fail open.
    pub fn meets_version(&self, required: &str) -> bool {
        match self.binary.as_ref().and_then(|b| b.version.as_deref()) {
            Some(version) => version >= required,
            None => true,
        }
    }
}

/// Run `--version` against a candidate. Outer `None` means the executable
/// is missing or refused the flag; the inner option is the parsed version.
fn probe_version(path: &Path) -> Option<Option<String>> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    // OpenSCAD prints "OpenSCAD version 2021.01" on stderr.
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    Some(parse_version(&text))
}

fn parse_version(text: &str) -> Option<String> {
    let pos = text.find("version ")?;
    let rest = &text[pos + "version ".len()..];
    let token: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(target_os = "windows")]
fn well_known_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files\OpenSCAD\openscad.com"),
        PathBuf::from(r"C:\Program Files\OpenSCAD\openscad.exe"),
        PathBuf::from(r"C:\Program Files\OpenSCAD (Nightly)\openscad.com"),
        PathBuf::from(r"C:\Program Files\OpenSCAD (Nightly)\openscad.exe"),
    ]
}

#[cfg(target_os = "macos")]
fn well_known_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(
        "/Applications/OpenSCAD.app/Contents/MacOS/OpenSCAD",
    )]
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn well_known_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/bin/openscad"),
        PathBuf::from("/usr/local/bin/openscad"),
    ]
}
