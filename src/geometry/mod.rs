// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - triangle soups, indexed topology and incidence

mod analytics;
mod bbox;
mod incidence;
mod mesh;
mod primitives;
mod refine;
mod topology;
mod triangle;

pub use analytics::{analyze, TopologyStats};
pub use bbox::BoundingBox;
pub use incidence::{
    build_incidence, EdgeIncidence, FaceIncidence, GeometryWarning, IncidenceTables,
    VertexIncidence,
};
pub use mesh::MeshTopology;
pub use primitives::Primitive;
pub use refine::{refine, split_triangle, RefineOptions};
pub use topology::{build, Edge, EdgeId, Face, FaceId, Topology, TopologyBuilder, VertexId};
pub use triangle::Triangle;
