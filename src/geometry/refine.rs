// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mid-edge (1-to-4) subdivision
//!
//! Each face (a, b, c) with edge midpoints m_ab, m_bc, m_ca is replaced by
//! (a, m_ab, m_ca), (m_ab, b, m_bc), (m_ca, m_bc, c) and (m_ab, m_bc, m_ca),
//! which keeps the original winding. The input is never modified; the
//! refined soup is run through the topology builder again, so midpoints on
//! a shared edge collapse to one vertex and ids stay first-seen ordered.

use super::topology::TopologyBuilder;
use super::{MeshTopology, Triangle};
use log::debug;
use nalgebra::Point3;

/// Subdivision parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOptions {
    /// Number of subdivision passes
    pub levels: u32,
    /// Push every vertex onto the sphere of this radius around the origin
    pub sphere_radius: Option<f32>,
    /// Weld tolerance for rebuilding the topology (0.0 = exact)
    pub weld_tolerance: f32,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            levels: 1,
            sphere_radius: None,
            weld_tolerance: 0.0,
        }
    }
}

impl RefineOptions {
    pub fn levels(mut self, levels: u32) -> Self {
        self.levels = levels;
        self
    }

    pub fn on_sphere(mut self, radius: f32) -> Self {
        self.sphere_radius = Some(radius);
        self
    }
}

fn project(point: Point3<f32>, radius: Option<f32>) -> Point3<f32> {
    match radius {
        Some(r) => {
            let norm = point.coords.norm();
            if norm > 0.0 {
                Point3::from(point.coords * (r / norm))
            } else {
                point
            }
        }
        None => point,
    }
}

/// The four sub-triangles of one triangle
pub fn split_triangle(triangle: &Triangle, sphere_radius: Option<f32>) -> [Triangle; 4] {
    let [a, b, c] = triangle.vertices;
    let m_ab = project(nalgebra::center(&a, &b), sphere_radius);
    let m_bc = project(nalgebra::center(&b, &c), sphere_radius);
    let m_ca = project(nalgebra::center(&c, &a), sphere_radius);
    let (a, b, c) = (
        project(a, sphere_radius),
        project(b, sphere_radius),
        project(c, sphere_radius),
    );

    [
        Triangle::new(a, m_ab, m_ca),
        Triangle::new(m_ab, b, m_bc),
        Triangle::new(m_ca, m_bc, c),
        Triangle::new(m_ab, m_bc, m_ca),
    ]
}

/// Subdivide `mesh` `options.levels` times into a new topology
pub fn refine(mesh: &MeshTopology, options: &RefineOptions) -> MeshTopology {
    let mut current = mesh.clone();

    for level in 0..options.levels {
        let soup: Vec<Triangle> = current
            .topology()
            .face_triangles()
            .iter()
            .flat_map(|t| split_triangle(t, options.sphere_radius))
            .collect();

        let mut builder =
            TopologyBuilder::with_tolerance(options.weld_tolerance).with_capacity(soup.len());
        builder.extend(&soup);
        current = MeshTopology::new(builder.finish());

        debug!(
            "refine level {}: {} vertices, {} faces",
            level + 1,
            current.vertex_count(),
            current.face_count()
        );
    }

    current
}
