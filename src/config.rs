// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Converter configuration system

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Converter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Deduplication tolerance used when the caller does not specify one
    pub default_tolerance: f64,
    /// External engine settings
    pub engine: EngineConfig,
}

/// External CAD engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Explicit engine executable path (overrides discovery)
    pub path: Option<PathBuf>,
    /// Minimum engine version, `YYYY.MM` prefix comparison
    pub required_version: Option<String>,
    /// Timeout for a single engine invocation
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_tolerance: 1e-6,
            engine: EngineConfig {
                path: None,
                required_version: None,
                timeout_secs: 60,
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from("stl2scad.toml").exists() {
            Self::from_file("stl2scad.toml")?
        } else {
            Self::default()
        };

        if let Ok(path) = std::env::var("OPENSCAD_PATH") {
            config.engine.path = Some(PathBuf::from(path));
        }

        if let Ok(timeout) = std::env::var("STL2SCAD_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.engine.timeout_secs = secs;
            }
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine.timeout_secs)
    }
}
