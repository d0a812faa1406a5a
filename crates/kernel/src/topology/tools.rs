//! Vertex extraction from face loops and volume shells.

use std::collections::BTreeSet;

use super::entities::{Edge, EdgeId, Face, FaceId, VertexId, Volume};
use crate::traits::EntityLookup;
use crate::validation::types::TopologyError;

/// Walk a face's edges and return its ordered vertex loop.
///
/// The walk starts with the first edge's `(a, b)` and each following edge
/// must share an endpoint with the vertex reached so far. Edges that form a
/// valid cycle but are listed out of walk order are rejected. A closing
/// vertex equal to the start is dropped, so a closed N-edge loop yields N
/// vertices.
pub fn extract_face_vertices<L>(face: &Face, edges: &L) -> Result<Vec<VertexId>, TopologyError>
where
    L: EntityLookup<EdgeId, Edge>,
{
    if face.edges.len() < 3 {
        return Err(TopologyError::TooFewEdges {
            count: face.edges.len(),
        });
    }

    let first = edge(edges, face.edges[0])?;
    let mut chain = Vec::with_capacity(face.edges.len() + 1);
    chain.push(first.a);
    chain.push(first.b);

    for (position, &edge_id) in face.edges.iter().enumerate().skip(1) {
        let last = chain[chain.len() - 1];
        let next = edge(edges, edge_id)?
            .opposite(last)
            .ok_or(TopologyError::BrokenWalk {
                edge: edge_id,
                position,
            })?;
        chain.push(next);
    }

    if chain.first() == chain.last() {
        chain.pop();
    }

    Ok(chain)
}

/// Union of the vertex loops of every face in a volume.
pub fn extract_volume_vertices<F, E>(
    volume: &Volume,
    faces: &F,
    edges: &E,
) -> Result<BTreeSet<VertexId>, TopologyError>
where
    F: EntityLookup<FaceId, Face>,
    E: EntityLookup<EdgeId, Edge>,
{
    let mut unique = BTreeSet::new();
    for &face_id in &volume.faces {
        let face = faces
            .lookup(face_id)
            .ok_or(TopologyError::MissingFace(face_id))?;
        unique.extend(extract_face_vertices(face, edges)?);
    }
    Ok(unique)
}

/// Every distinct vertex touched by a face's edges, regardless of walk order.
pub fn face_vertex_set<L>(face: &Face, edges: &L) -> Result<BTreeSet<VertexId>, TopologyError>
where
    L: EntityLookup<EdgeId, Edge>,
{
    let mut unique = BTreeSet::new();
    for &edge_id in &face.edges {
        let e = edge(edges, edge_id)?;
        unique.insert(e.a);
        unique.insert(e.b);
    }
    Ok(unique)
}

fn edge<L: EntityLookup<EdgeId, Edge>>(edges: &L, id: EdgeId) -> Result<&Edge, TopologyError> {
    edges.lookup(id).ok_or(TopologyError::MissingEdge(id))
}
