// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex, edge and face incidence tables
//!
//! Every table is a pure function of the vertex, edge and face lists. The
//! per-entity "sets" are duplicate-free `Vec`s in ascending id order, except
//! adjacent faces which follow discovery order across the face's edges.
//! Boundary and non-manifold edges are represented as-is; non-manifold and
//! degenerate geometry is reported through [`GeometryWarning`].

use super::topology::{
    edge_key, edge_lookup, face_edge_pairs, Edge, EdgeId, Face, FaceId, Topology, VertexId,
};
use log::{debug, warn};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Edges and faces touching a vertex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexIncidence {
    pub edges: Vec<EdgeId>,
    pub faces: Vec<FaceId>,
}

impl VertexIncidence {
    /// Number of incident edges
    pub fn valence(&self) -> usize {
        self.edges.len()
    }

    pub fn is_isolated(&self) -> bool {
        self.edges.is_empty() && self.faces.is_empty()
    }
}

/// Endpoints of an edge and the faces using it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeIncidence {
    pub vertices: [VertexId; 2],
    pub faces: Vec<FaceId>,
}

impl EdgeIncidence {
    /// Used by exactly one face
    pub fn is_boundary(&self) -> bool {
        self.faces.len() == 1
    }

    /// Used by exactly two faces
    pub fn is_manifold(&self) -> bool {
        self.faces.len() == 2
    }

    pub fn is_non_manifold(&self) -> bool {
        self.faces.len() > 2
    }
}

/// Vertices, edges and neighbours of a face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceIncidence {
    pub vertices: [VertexId; 3],
    /// Edge ids for the sides (v0,v1), (v1,v2), (v2,v0); `None` where the
    /// side collapses to a single vertex
    pub edges: [Option<EdgeId>; 3],
    /// Faces sharing at least one edge with this face
    pub adjacent: Vec<FaceId>,
}

impl FaceIncidence {
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().flatten().copied()
    }

    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.vertices;
        a == b || b == c || c == a
    }
}

/// Non-fatal findings about the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryWarning {
    /// More than two faces share the edge
    NonManifoldEdge { edge: EdgeId, face_count: usize },
    /// The face repeats a vertex id
    DegenerateFace { face: FaceId },
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonManifoldEdge { edge, face_count } => {
                write!(f, "edge {} is shared by {} faces", edge, face_count)
            }
            Self::DegenerateFace { face } => write!(f, "face {} repeats a vertex", face),
        }
    }
}

/// Incidence tables for every vertex, edge and face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidenceTables {
    vertices: Vec<VertexIncidence>,
    edges: Vec<EdgeIncidence>,
    faces: Vec<FaceIncidence>,
    warnings: Vec<GeometryWarning>,
}

impl IncidenceTables {
    /// Derive the tables from the three lists.
    ///
    /// Face sides are matched to `edges` by unordered endpoint pair. Faces
    /// must only reference ids below `vertices.len()`.
    pub fn build(vertices: &[Point3<f32>], edges: &[Edge], faces: &[Face]) -> Self {
        let lookup = edge_lookup(edges);

        let mut vertex_table = vec![VertexIncidence::default(); vertices.len()];
        for (id, edge) in edges.iter().enumerate() {
            vertex_table[edge.a].edges.push(id);
            if edge.b != edge.a {
                vertex_table[edge.b].edges.push(id);
            }
        }

        let mut edge_table: Vec<EdgeIncidence> = edges
            .iter()
            .map(|edge| EdgeIncidence {
                vertices: edge.endpoints(),
                faces: Vec::new(),
            })
            .collect();

        let mut face_table = Vec::with_capacity(faces.len());
        for (id, face) in faces.iter().enumerate() {
            for &v in face {
                push_unique_last(&mut vertex_table[v].faces, id);
            }

            let mut slots = [None; 3];
            for (slot, (a, b)) in face_edge_pairs(face).into_iter().enumerate() {
                if a == b {
                    continue;
                }
                if let Some(&edge) = lookup.get(&edge_key(a, b)) {
                    push_unique_last(&mut edge_table[edge].faces, id);
                    slots[slot] = Some(edge);
                }
            }

            face_table.push(FaceIncidence {
                vertices: *face,
                edges: slots,
                adjacent: Vec::new(),
            });
        }

        for (id, face) in face_table.iter_mut().enumerate() {
            for edge in face.edges.iter().flatten() {
                for &other in &edge_table[*edge].faces {
                    if other != id && !face.adjacent.contains(&other) {
                        face.adjacent.push(other);
                    }
                }
            }
        }

        let mut warnings: Vec<GeometryWarning> = edge_table
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_non_manifold())
            .map(|(edge, e)| GeometryWarning::NonManifoldEdge {
                edge,
                face_count: e.faces.len(),
            })
            .collect();
        warnings.extend(
            face_table
                .iter()
                .enumerate()
                .filter(|(_, f)| f.is_degenerate())
                .map(|(face, _)| GeometryWarning::DegenerateFace { face }),
        );

        if !warnings.is_empty() {
            warn!(
                "mesh has {} geometry warning(s): {} non-manifold edge(s), {} degenerate face(s)",
                warnings.len(),
                warnings
                    .iter()
                    .filter(|w| matches!(w, GeometryWarning::NonManifoldEdge { .. }))
                    .count(),
                warnings
                    .iter()
                    .filter(|w| matches!(w, GeometryWarning::DegenerateFace { .. }))
                    .count(),
            );
            for warning in &warnings {
                debug!("{}", warning);
            }
        }

        Self {
            vertices: vertex_table,
            edges: edge_table,
            faces: face_table,
            warnings,
        }
    }

    pub fn vertices(&self) -> &[VertexIncidence] {
        &self.vertices
    }

    pub fn edges(&self) -> &[EdgeIncidence] {
        &self.edges
    }

    pub fn faces(&self) -> &[FaceIncidence] {
        &self.faces
    }

    pub fn vertex(&self, id: VertexId) -> Option<&VertexIncidence> {
        self.vertices.get(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeIncidence> {
        self.edges.get(id)
    }

    pub fn face(&self, id: FaceId) -> Option<&FaceIncidence> {
        self.faces.get(id)
    }

    pub fn warnings(&self) -> &[GeometryWarning] {
        &self.warnings
    }

    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_boundary())
            .map(|(id, _)| id)
    }

    pub fn non_manifold_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_non_manifold())
            .map(|(id, _)| id)
    }
}

/// Ids arrive in ascending order, so checking the tail is enough
fn push_unique_last(ids: &mut Vec<usize>, id: usize) {
    if ids.last() != Some(&id) {
        ids.push(id);
    }
}

/// Build incidence tables for a topology
pub fn build_incidence(topology: &Topology) -> IncidenceTables {
    IncidenceTables::build(topology.vertices(), topology.edges(), topology.faces())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{build, Triangle};

    fn tri(coords: [[f32; 3]; 3]) -> Triangle {
        Triangle::from_coords(coords)
    }

    #[test]
    fn test_single_triangle_incidence() {
        let topo = build(&[tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])]);
        let inc = build_incidence(&topo);

        assert_eq!(inc.vertex(0).unwrap().edges, vec![0, 2]);
        assert_eq!(inc.vertex(0).unwrap().faces, vec![0]);
        assert_eq!(inc.vertex(1).unwrap().edges, vec![0, 1]);
        assert_eq!(inc.face(0).unwrap().edges, [Some(0), Some(1), Some(2)]);
        assert!(inc.face(0).unwrap().adjacent.is_empty());
        assert_eq!(inc.boundary_edges().count(), 3);
        assert!(inc.warnings().is_empty());
    }

    #[test]
    fn test_shared_edge_adjacency() {
        let topo = build(&[
            tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            tri([[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
        ]);
        let inc = build_incidence(&topo);

        let shared = topo.find_edge(1, 2).unwrap();
        assert_eq!(inc.edge(shared).unwrap().faces, vec![0, 1]);
        assert!(inc.edge(shared).unwrap().is_manifold());
        assert_eq!(inc.face(0).unwrap().adjacent, vec![1]);
        assert_eq!(inc.face(1).unwrap().adjacent, vec![0]);
        // Second face sides: (1,3), (3,2), (2,1)
        assert_eq!(inc.face(1).unwrap().edges, [Some(3), Some(4), Some(1)]);
    }

    #[test]
    fn test_non_manifold_edge_is_reported() {
        // Three fins sharing the edge (0,0,0)-(1,0,0)
        let topo = build(&[
            tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            tri([[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, -1.0, 0.0]]),
            tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]),
        ]);
        let inc = build_incidence(&topo);

        assert_eq!(inc.edge(0).unwrap().faces, vec![0, 1, 2]);
        assert_eq!(inc.non_manifold_edges().collect::<Vec<_>>(), vec![0]);
        assert_eq!(
            inc.warnings(),
            &[GeometryWarning::NonManifoldEdge {
                edge: 0,
                face_count: 3
            }]
        );
        assert_eq!(inc.face(0).unwrap().adjacent, vec![1, 2]);
    }

    #[test]
    fn test_degenerate_face() {
        let topo = build(&[tri([[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]])]);
        let inc = build_incidence(&topo);

        let face = inc.face(0).unwrap();
        assert_eq!(face.edges, [None, Some(0), Some(0)]);
        assert_eq!(face.edge_ids().count(), 2);
        assert_eq!(inc.edge(0).unwrap().faces, vec![0]);
        assert_eq!(inc.vertex(0).unwrap().faces, vec![0]);
        assert_eq!(
            inc.warnings(),
            &[GeometryWarning::DegenerateFace { face: 0 }]
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let soup = [
            tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            tri([[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
        ];
        let topo = build(&soup);
        assert_eq!(build_incidence(&topo), build_incidence(&build(&soup)));
    }
}
