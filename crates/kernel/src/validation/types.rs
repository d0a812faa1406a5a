//! Findings produced by the topology validators.

use crate::topology::entities::{EdgeId, FaceId, VertexId};

/// Why a face loop or volume shell failed topological validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("a face needs at least 3 edges, got {count}")]
    TooFewEdges { count: usize },

    #[error("edge {0} does not exist")]
    MissingEdge(EdgeId),

    #[error("vertex {vertex} has degree {degree} in the loop, expected 2")]
    VertexDegree { vertex: VertexId, degree: usize },

    #[error("edge {edge} at position {position} does not continue the walk")]
    BrokenWalk { edge: EdgeId, position: usize },

    #[error("loop has only {vertices} distinct vertices")]
    DegenerateLoop { vertices: usize },

    #[error("a volume needs at least 4 faces, got {count}")]
    TooFewFaces { count: usize },

    #[error("face {0} does not exist")]
    MissingFace(FaceId),

    #[error("face {0} is listed more than once")]
    DuplicateFace(FaceId),

    #[error("edge {edge} is used by {count} faces, expected 2")]
    EdgeUsage { edge: EdgeId, count: usize },
}
