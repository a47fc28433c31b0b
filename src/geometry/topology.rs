// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Indexed vertex/edge/face topology built from a triangle soup
//!
//! Ids are assigned purely by first-seen order while scanning triangles, so
//! the same input always produces the same lists. Lookups are hashed; the
//! ordered `Vec`s carry the insertion order.

use super::Triangle;
use ahash::AHashMap;
use log::debug;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

pub type VertexId = usize;
pub type EdgeId = usize;
pub type FaceId = usize;

/// Vertex ids of one face in input winding order
pub type Face = [VertexId; 3];

/// Unordered vertex pair, stored in the orientation it was first observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
}

impl Edge {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self { a, b }
    }

    /// Orientation-independent key
    pub fn key(&self) -> (VertexId, VertexId) {
        edge_key(self.a, self.b)
    }

    pub fn endpoints(&self) -> [VertexId; 2] {
        [self.a, self.b]
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.a == vertex || self.b == vertex
    }

    /// The opposite endpoint, if `vertex` lies on this edge
    pub fn other(&self, vertex: VertexId) -> Option<VertexId> {
        if self.a == vertex {
            Some(self.b)
        } else if self.b == vertex {
            Some(self.a)
        } else {
            None
        }
    }
}

pub(crate) fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The three edge slots of a face, in the order (v0,v1), (v1,v2), (v2,v0)
pub(crate) fn face_edge_pairs(face: &Face) -> [(VertexId, VertexId); 3] {
    [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])]
}

pub(crate) fn edge_lookup(edges: &[Edge]) -> AHashMap<(VertexId, VertexId), EdgeId> {
    edges
        .iter()
        .enumerate()
        .map(|(id, edge)| (edge.key(), id))
        .collect()
}

/// Deduplicated vertex, edge and face lists
#[derive(Debug, Clone)]
pub struct Topology {
    vertices: Vec<Point3<f32>>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    edge_index: AHashMap<(VertexId, VertexId), EdgeId>,
}

impl PartialEq for Topology {
    // The edge index is derived from `edges`
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.edges == other.edges && self.faces == other.faces
    }
}

impl Topology {
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Edge id joining `a` and `b`, in either endpoint order
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&edge_key(a, b)).copied()
    }

    pub fn face_triangle(&self, face: FaceId) -> Option<Triangle> {
        self.faces.get(face).map(|f| {
            Triangle::new(
                self.vertices[f[0]],
                self.vertices[f[1]],
                self.vertices[f[2]],
            )
        })
    }

    /// Resolve every face back into a triangle, e.g. for encoding
    pub fn face_triangles(&self) -> Vec<Triangle> {
        self.faces
            .iter()
            .map(|f| {
                Triangle::new(
                    self.vertices[f[0]],
                    self.vertices[f[1]],
                    self.vertices[f[2]],
                )
            })
            .collect()
    }

    /// Flat vertex array for renderer buffers
    pub fn vertex_buffer(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Flat triangle index array for renderer buffers
    pub fn index_buffer(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flat_map(|f| f.iter().map(|&v| v as u32))
            .collect()
    }
}

/// Vertex dedup strategy
#[derive(Debug, Clone)]
enum VertexIndex {
    /// Bit-exact coordinates; `-0.0` folds onto `0.0`
    Exact(AHashMap<[u32; 3], VertexId>),
    /// Uniform grid with cell size equal to the tolerance
    Welded {
        tolerance: f32,
        cells: AHashMap<[i64; 3], Vec<VertexId>>,
    },
}

fn canonical_bits(value: f32) -> u32 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl VertexIndex {
    fn exact_key(point: &Point3<f32>) -> [u32; 3] {
        [
            canonical_bits(point.x),
            canonical_bits(point.y),
            canonical_bits(point.z),
        ]
    }

    /// Grid cell of `point`; coordinates far outside the grid saturate
    /// onto the edge cells
    fn cell(point: &Point3<f32>, tolerance: f32) -> [i64; 3] {
        [
            (point.x / tolerance).floor() as i64,
            (point.y / tolerance).floor() as i64,
            (point.z / tolerance).floor() as i64,
        ]
    }

    fn find(&self, point: &Point3<f32>, vertices: &[Point3<f32>]) -> Option<VertexId> {
        match self {
            Self::Exact(map) => map.get(&Self::exact_key(point)).copied(),
            Self::Welded { tolerance, cells } => {
                let [cx, cy, cz] = Self::cell(point, *tolerance);
                let mut best: Option<VertexId> = None;
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            let Some(ids) = cells.get(&[
                                cx.saturating_add(dx),
                                cy.saturating_add(dy),
                                cz.saturating_add(dz),
                            ]) else {
                                continue;
                            };
                            for &id in ids {
                                if (vertices[id] - *point).norm() <= *tolerance
                                    && best.map_or(true, |b| id < b)
                                {
                                    best = Some(id);
                                }
                            }
                        }
                    }
                }
                best
            }
        }
    }

    fn insert(&mut self, point: &Point3<f32>, id: VertexId) {
        match self {
            Self::Exact(map) => {
                map.insert(Self::exact_key(point), id);
            }
            Self::Welded { tolerance, cells } => {
                cells
                    .entry(Self::cell(point, *tolerance))
                    .or_default()
                    .push(id);
            }
        }
    }
}

/// Incremental, order-preserving topology construction
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    vertices: Vec<Point3<f32>>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    vertex_index: VertexIndex,
    edge_index: AHashMap<(VertexId, VertexId), EdgeId>,
}

impl TopologyBuilder {
    /// Builder using bit-exact vertex equality
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            vertex_index: VertexIndex::Exact(AHashMap::new()),
            edge_index: AHashMap::new(),
        }
    }

    /// Builder merging points within `tolerance` of an earlier vertex.
    /// A non-positive or non-finite tolerance falls back to exact equality.
    pub fn with_tolerance(tolerance: f32) -> Self {
        let mut builder = Self::new();
        if tolerance.is_finite() && tolerance > 0.0 {
            builder.vertex_index = VertexIndex::Welded {
                tolerance,
                cells: AHashMap::new(),
            };
        }
        builder
    }

    pub fn with_capacity(mut self, triangles: usize) -> Self {
        self.faces.reserve(triangles);
        self.vertices.reserve(triangles / 2 + 3);
        self.edges.reserve(triangles * 3 / 2 + 3);
        self
    }

    fn resolve_vertex(&mut self, point: &Point3<f32>) -> VertexId {
        if let Some(id) = self.vertex_index.find(point, &self.vertices) {
            return id;
        }
        let id = self.vertices.len();
        self.vertices.push(*point);
        self.vertex_index.insert(point, id);
        id
    }

    /// Add one triangle and return its face id
    pub fn push(&mut self, triangle: &Triangle) -> FaceId {
        let face = [
            self.resolve_vertex(&triangle.vertices[0]),
            self.resolve_vertex(&triangle.vertices[1]),
            self.resolve_vertex(&triangle.vertices[2]),
        ];

        for (a, b) in face_edge_pairs(&face) {
            // A collapsed side has no edge
            if a == b {
                continue;
            }
            let next_id = self.edges.len();
            let id = *self.edge_index.entry(edge_key(a, b)).or_insert(next_id);
            if id == next_id {
                self.edges.push(Edge::new(a, b));
            }
        }

        let id = self.faces.len();
        self.faces.push(face);
        id
    }

    pub fn extend<'a>(&mut self, triangles: impl IntoIterator<Item = &'a Triangle>) -> &mut Self {
        for triangle in triangles {
            self.push(triangle);
        }
        self
    }

    pub fn finish(self) -> Topology {
        debug!(
            "topology built: {} vertices, {} edges, {} faces",
            self.vertices.len(),
            self.edges.len(),
            self.faces.len()
        );
        Topology {
            vertices: self.vertices,
            edges: self.edges,
            faces: self.faces,
            edge_index: self.edge_index,
        }
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the topology with bit-exact vertex dedup
pub fn build(triangles: &[Triangle]) -> Topology {
    let mut builder = TopologyBuilder::new().with_capacity(triangles.len());
    builder.extend(triangles);
    builder.finish()
}
