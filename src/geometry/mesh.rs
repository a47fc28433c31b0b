// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Immutable mesh topology: indexed lists plus incidence tables

use super::incidence::{build_incidence, IncidenceTables};
use super::topology::{Topology, TopologyBuilder};
use super::Triangle;
use crate::config::TopologyConfig;
use crate::error::Result;
use crate::io;
use std::path::Path;

/// Topology and incidence tables built once from a triangle soup.
///
/// Nothing is mutable after construction; operations that change the mesh
/// (e.g. [`super::refine`]) return a new `MeshTopology`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTopology {
    topology: Topology,
    incidence: IncidenceTables,
}

impl MeshTopology {
    pub fn new(topology: Topology) -> Self {
        let incidence = build_incidence(&topology);
        Self {
            topology,
            incidence,
        }
    }

    /// Bit-exact vertex dedup
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        Self::new(super::build(triangles))
    }

    /// Dedup with the configured weld tolerance
    pub fn from_triangles_with_tolerance(triangles: &[Triangle], tolerance: f32) -> Self {
        let mut builder = TopologyBuilder::with_tolerance(tolerance).with_capacity(triangles.len());
        builder.extend(triangles);
        Self::new(builder.finish())
    }

    /// Build from decoded STL content using the configured weld tolerance
    pub fn from_document(document: &io::StlDocument, config: &TopologyConfig) -> Self {
        Self::from_triangles_with_tolerance(&document.triangles, config.weld_tolerance)
    }

    /// Decode an STL file and build its topology
    pub fn load(path: impl AsRef<Path>, config: &TopologyConfig) -> Result<Self> {
        let document = io::StlReader::from_config(config).read(path)?;
        Ok(Self::from_document(&document, config))
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn incidence(&self) -> &IncidenceTables {
        &self.incidence
    }

    pub fn vertex_count(&self) -> usize {
        self.topology.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    pub fn face_count(&self) -> usize {
        self.topology.face_count()
    }

    pub fn into_parts(self) -> (Topology, IncidenceTables) {
        (self.topology, self.incidence)
    }
}
