use std::fmt;

use crate::topology::entities::{EdgeId, FaceId, VertexId, VolumeId};
use crate::validation::TopologyError;

/// A handle tagged with the kind of entity it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Vertex(VertexId),
    Edge(EdgeId),
    Face(FaceId),
    Volume(VolumeId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Vertex(id) => write!(f, "{id}"),
            EntityRef::Edge(id) => write!(f, "{id}"),
            EntityRef::Face(id) => write!(f, "{id}"),
            EntityRef::Volume(id) => write!(f, "{id}"),
        }
    }
}

/// Why the model refused to create (or restore) an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("edge endpoints are the same vertex {0}")]
    SelfLoop(VertexId),

    #[error("vertex {0} does not exist")]
    MissingVertex(VertexId),

    #[error("an edge between {a} and {b} already exists as {existing}")]
    DuplicateEdge {
        a: VertexId,
        b: VertexId,
        existing: EdgeId,
    },

    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),

    #[error("face vertices are not coplanar")]
    NotCoplanar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("entity not found: {0}")]
    NotFound(EntityRef),

    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("handle already occupied: {0}")]
    Occupied(EntityRef),

    #[error("{entity} is still referenced by {referenced_by}")]
    InUse {
        entity: EntityRef,
        referenced_by: EntityRef,
    },
}

impl From<TopologyError> for ModelError {
    fn from(err: TopologyError) -> Self {
        ModelError::Rejected(Rejection::Topology(err))
    }
}
