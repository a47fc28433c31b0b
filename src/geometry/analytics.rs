// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Topology statistics and surface-quality detection

use super::{BoundingBox, MeshTopology};
use serde::{Deserialize, Serialize};

/// Counts and quality flags for a mesh topology. Detection only; nothing
/// here repairs the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub face_count: usize,
    /// Edges used by exactly one face
    pub boundary_edges: usize,
    /// Edges used by exactly two faces
    pub manifold_edges: usize,
    /// Edges used by more than two faces
    pub non_manifold_edges: usize,
    /// Faces repeating a vertex id
    pub degenerate_faces: usize,
    /// Vertices referenced by no face
    pub isolated_vertices: usize,
    /// V - E + F
    pub euler_characteristic: i64,
    /// No boundary and no non-manifold edges
    pub is_closed: bool,
    pub surface_area: f64,
    pub bbox: BoundingBox,
}

impl TopologyStats {
    /// Pretty print statistics
    pub fn print(&self) {
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║              MESH TOPOLOGY                               ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║ Vertices:        {:>10}                              ║", self.vertex_count);
        println!("║ Edges:           {:>10}                              ║", self.edge_count);
        println!("║ Faces:           {:>10}                              ║", self.face_count);
        println!("║ Euler (V-E+F):   {:>10}                              ║", self.euler_characteristic);
        println!("║                                                          ║");
        println!("║ Manifold edges:  {:>10}                              ║", self.manifold_edges);
        println!("║ Boundary edges:  {:>10}                              ║", self.boundary_edges);
        println!("║ Non-manifold:    {:>10}                              ║", self.non_manifold_edges);
        println!("║ Degenerate faces:{:>10}                              ║", self.degenerate_faces);
        println!(
            "║ Closed:          {:>10}                              ║",
            if self.is_closed { "Yes" } else { "No" }
        );
        println!("║                                                          ║");
        println!("║ Surface Area:    {:>10.4}                              ║", self.surface_area);
        if !self.bbox.is_empty() {
            let size = self.bbox.size();
            println!(
                "║ Size: {:>9.3} × {:>9.3} × {:>9.3}                    ║",
                size.x, size.y, size.z
            );
        }
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}

/// Analyze a mesh topology
pub fn analyze(mesh: &MeshTopology) -> TopologyStats {
    let topology = mesh.topology();
    let incidence = mesh.incidence();

    let mut boundary_edges = 0;
    let mut manifold_edges = 0;
    let mut non_manifold_edges = 0;
    for edge in incidence.edges() {
        match edge.faces.len() {
            1 => boundary_edges += 1,
            2 => manifold_edges += 1,
            n if n > 2 => non_manifold_edges += 1,
            _ => {}
        }
    }

    let degenerate_faces = incidence.faces().iter().filter(|f| f.is_degenerate()).count();
    let isolated_vertices = incidence.vertices().iter().filter(|v| v.faces.is_empty()).count();

    let surface_area: f64 = topology
        .face_triangles()
        .iter()
        .map(|t| t.area() as f64)
        .sum();

    let euler_characteristic = topology.vertex_count() as i64 - topology.edge_count() as i64
        + topology.face_count() as i64;

    TopologyStats {
        vertex_count: topology.vertex_count(),
        edge_count: topology.edge_count(),
        face_count: topology.face_count(),
        boundary_edges,
        manifold_edges,
        non_manifold_edges,
        degenerate_faces,
        isolated_vertices,
        euler_characteristic,
        is_closed: !topology.is_empty() && boundary_edges == 0 && non_manifold_edges == 0,
        surface_area,
        bbox: BoundingBox::from_points(topology.vertices()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Primitive, Triangle};

    #[test]
    fn test_analyze_cube() {
        let mesh = MeshTopology::from_triangles(&Primitive::cube(10.0).triangles());
        let stats = analyze(&mesh);

        assert_eq!(stats.vertex_count, 8);
        assert_eq!(stats.edge_count, 18);
        assert_eq!(stats.face_count, 12);
        assert_eq!(stats.manifold_edges, 18);
        assert_eq!(stats.euler_characteristic, 2);
        assert!(stats.is_closed);
        assert!((stats.surface_area - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_open_strip_has_boundary() {
        let mesh = MeshTopology::from_triangles(&[
            Triangle::from_coords([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            Triangle::from_coords([[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
        ]);
        let stats = analyze(&mesh);

        assert_eq!(stats.boundary_edges, 4);
        assert_eq!(stats.manifold_edges, 1);
        assert!(!stats.is_closed);
        assert_eq!(stats.euler_characteristic, 1);
    }

    #[test]
    fn test_empty_mesh() {
        let stats = analyze(&MeshTopology::from_triangles(&[]));
        assert_eq!(stats.face_count, 0);
        assert!(!stats.is_closed);
        assert_eq!(stats.surface_area, 0.0);
    }
}
