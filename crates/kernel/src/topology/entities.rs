use serde::{Deserialize, Serialize};

use super::store::entity_key;
use crate::geometry::point::Point3d;

// ─── Entity Keys ─────────────────────────────────────────────────────────────

entity_key! {
    pub struct VertexId;
    pub struct EdgeId;
    pub struct FaceId;
    pub struct VolumeId;
}

// ─── Entities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3d,
}

impl Vertex {
    pub fn new(position: Point3d) -> Self {
        Self { position }
    }
}

/// A straight edge between two distinct vertices.
///
/// Undirected: `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
}

impl Edge {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self { a, b }
    }

    /// True if this edge joins `u` and `v` in either direction.
    pub fn connects(&self, u: VertexId, v: VertexId) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }

    pub fn touches(&self, v: VertexId) -> bool {
        self.a == v || self.b == v
    }

    /// The endpoint opposite `v`, if `v` is an endpoint.
    pub fn opposite(&self, v: VertexId) -> Option<VertexId> {
        if self.a == v {
            Some(self.b)
        } else if self.b == v {
            Some(self.a)
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.connects(other.a, other.b)
    }
}

impl Eq for Edge {}

/// A planar polygon bounded by a single loop of edges, listed in walk order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Face {
    pub edges: Vec<EdgeId>,
}

impl Face {
    pub fn new(edges: Vec<EdgeId>) -> Self {
        Self { edges }
    }
}

/// A closed set of faces; every edge of the set bounds exactly two of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Volume {
    pub faces: Vec<FaceId>,
}

impl Volume {
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces }
    }
}
