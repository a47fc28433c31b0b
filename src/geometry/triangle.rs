// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle soup representation
//!
//! A [`Triangle`] is an ordered triple of points exactly as read from an STL
//! record. Triangles share nothing with each other; indexing happens in the
//! topology builder.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Three points in file order; the order defines the winding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    pub fn from_coords(coords: [[f32; 3]; 3]) -> Self {
        Self::new(
            Point3::from(coords[0]),
            Point3::from(coords[1]),
            Point3::from(coords[2]),
        )
    }

    /// Cross product of the two edges leaving the first vertex
    fn scaled_normal(&self) -> Vector3<f32> {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Unit normal following the right-hand rule over the winding.
    /// Returns the zero vector for degenerate (zero-area) triangles.
    pub fn normal(&self) -> Vector3<f32> {
        self.scaled_normal()
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn area(&self) -> f32 {
        self.scaled_normal().norm() * 0.5
    }

    /// True when two of the three points coincide exactly
    pub fn has_repeated_point(&self) -> bool {
        let [a, b, c] = self.vertices;
        a == b || b == c || c == a
    }

    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

impl From<[[f32; 3]; 3]> for Triangle {
    fn from(coords: [[f32; 3]; 3]) -> Self {
        Self::from_coords(coords)
    }
}
