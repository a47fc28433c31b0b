// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Timed load pipeline for the command-line tool

use crate::config::TopologyConfig;
use crate::geometry::MeshTopology;
use crate::io::{StlEncoding, StlReader};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Result of decoding and indexing one file
pub struct LoadResult {
    pub mesh: MeshTopology,
    pub encoding: StlEncoding,
    pub name: Option<String>,
    pub decode_time: Duration,
    pub build_time: Duration,
}

/// Runs decode → topology → incidence with per-phase timing
pub struct Runner {
    config: TopologyConfig,
}

impl Runner {
    pub fn new(config: TopologyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    pub fn load(&self, path: &Path) -> Result<LoadResult> {
        let start = Instant::now();
        let document = StlReader::from_config(&self.config)
            .read(path)
            .with_context(|| format!("Failed to decode STL file: {}", path.display()))?;
        let decode_time = start.elapsed();

        let start = Instant::now();
        let mesh = MeshTopology::from_document(&document, &self.config);
        let build_time = start.elapsed();

        Ok(LoadResult {
            mesh,
            encoding: document.encoding,
            name: document.name,
            decode_time,
            build_time,
        })
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(TopologyConfig::default())
    }
}
