// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL Topology Engine
//!
//! Decodes STL triangle soups (ASCII or binary), builds a deduplicated
//! vertex/edge/face topology with full incidence tables, and encodes face
//! lists back to STL.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;

pub use config::TopologyConfig;
pub use error::{FormatError, MeshError, Result};
pub use geometry::{
    build, build_incidence, refine, GeometryWarning, IncidenceTables, MeshTopology,
    RefineOptions, Topology, Triangle,
};
pub use io::{decode, encode, StlReader, StlWriter};

use std::path::Path;

/// Decode an STL file and build its topology with default settings
pub fn load(path: impl AsRef<Path>) -> Result<MeshTopology> {
    MeshTopology::load(path, &TopologyConfig::default())
}

/// Encode the faces of a topology as binary STL
pub fn save(path: impl AsRef<Path>, topology: &Topology) -> Result<()> {
    encode(path, &topology.face_triangles())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load("does/not/exist.stl").unwrap_err();
        assert!(err.is_io());
    }
}
