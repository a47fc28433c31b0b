// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine configuration

use crate::io::{NormalMode, DEFAULT_HEADER};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory by [`TopologyConfig::load`]
pub const CONFIG_FILE: &str = "stl-topology.toml";

/// Decoding, topology and encoding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Vertex merge distance; 0.0 means bit-exact equality
    pub weld_tolerance: f32,
    /// Binary STL header text (at most 79 bytes are written)
    pub header: String,
    /// Normal vectors written by the encoder
    pub normals: NormalMode,
    /// Write ASCII instead of binary STL
    pub ascii_output: bool,
    /// Parse binary records in parallel
    pub parallel_decode: bool,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            weld_tolerance: 0.0,
            header: DEFAULT_HEADER.to_string(),
            normals: NormalMode::Computed,
            ascii_output: false,
            parallel_decode: true,
        }
    }
}

impl TopologyConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: TopologyConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `stl-topology.toml` from the working directory if present, then
    /// apply environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `STL_TOPOLOGY_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(tolerance) = std::env::var("STL_TOPOLOGY_WELD_TOLERANCE") {
            self.weld_tolerance = tolerance
                .parse()
                .with_context(|| format!("Invalid STL_TOPOLOGY_WELD_TOLERANCE: {}", tolerance))?;
        }

        if let Ok(header) = std::env::var("STL_TOPOLOGY_HEADER") {
            self.header = header;
        }

        if let Ok(normals) = std::env::var("STL_TOPOLOGY_NORMALS") {
            self.normals = match normals.to_lowercase().as_str() {
                "computed" => NormalMode::Computed,
                "zero" => NormalMode::Zero,
                other => bail!("Invalid STL_TOPOLOGY_NORMALS: {}", other),
            };
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.weld_tolerance.is_finite() || self.weld_tolerance < 0.0 {
            bail!(
                "weld_tolerance must be a finite, non-negative number (got {})",
                self.weld_tolerance
            );
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
