// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Closed primitive solids as triangle soups, with outward winding

use super::Triangle;
use nalgebra::Point3;

/// Primitive solids centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Regular tetrahedron inscribed in the cube `[-size, size]³`
    Tetrahedron { size: f32 },
    /// Octahedron with vertices on the axes at distance `radius`
    Octahedron { radius: f32 },
    /// Axis-aligned cube with edge length `size`
    Cube { size: f32 },
}

impl Primitive {
    pub fn tetrahedron(size: f32) -> Self {
        Self::Tetrahedron { size }
    }

    pub fn octahedron(radius: f32) -> Self {
        Self::Octahedron { radius }
    }

    pub fn cube(size: f32) -> Self {
        Self::Cube { size }
    }

    /// Parse a primitive name as used on the command line
    pub fn from_name(name: &str, size: f32) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "tetrahedron" | "tetra" => Some(Self::tetrahedron(size)),
            "octahedron" | "octa" => Some(Self::octahedron(size)),
            "cube" => Some(Self::cube(size)),
            _ => None,
        }
    }

    pub fn triangles(&self) -> Vec<Triangle> {
        match *self {
            Self::Tetrahedron { size } => generate_tetrahedron(size),
            Self::Octahedron { radius } => generate_octahedron(radius),
            Self::Cube { size } => generate_cube(size),
        }
    }
}

fn from_indices(positions: &[Point3<f32>], faces: &[[usize; 3]]) -> Vec<Triangle> {
    faces
        .iter()
        .map(|f| Triangle::new(positions[f[0]], positions[f[1]], positions[f[2]]))
        .collect()
}

fn generate_tetrahedron(size: f32) -> Vec<Triangle> {
    let s = size;
    let positions = [
        Point3::new(s, s, s),
        Point3::new(s, -s, -s),
        Point3::new(-s, s, -s),
        Point3::new(-s, -s, s),
    ];
    from_indices(&positions, &[[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]])
}

fn generate_octahedron(radius: f32) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(8);

    for sz in [1.0f32, -1.0] {
        for sy in [1.0f32, -1.0] {
            for sx in [1.0f32, -1.0] {
                let a = Point3::new(sx * radius, 0.0, 0.0);
                let b = Point3::new(0.0, sy * radius, 0.0);
                let c = Point3::new(0.0, 0.0, sz * radius);
                // Odd number of negative axes flips the winding
                if sx * sy * sz > 0.0 {
                    triangles.push(Triangle::new(a, b, c));
                } else {
                    triangles.push(Triangle::new(a, c, b));
                }
            }
        }
    }

    triangles
}

fn generate_cube(size: f32) -> Vec<Triangle> {
    let (lo, hi) = (-size / 2.0, size / 2.0);

    let positions = [
        Point3::new(lo, lo, lo),
        Point3::new(hi, lo, lo),
        Point3::new(hi, hi, lo),
        Point3::new(lo, hi, lo),
        Point3::new(lo, lo, hi),
        Point3::new(hi, lo, hi),
        Point3::new(hi, hi, hi),
        Point3::new(lo, hi, hi),
    ];

    from_indices(
        &positions,
        &[
            // z+
            [4, 5, 6],
            [4, 6, 7],
            // z-
            [1, 0, 3],
            [1, 3, 2],
            // x+
            [5, 1, 2],
            [5, 2, 6],
            // x-
            [0, 4, 7],
            [0, 7, 3],
            // y+
            [7, 6, 2],
            [7, 2, 3],
            // y-
            [0, 1, 5],
            [0, 5, 4],
        ],
    )
}
