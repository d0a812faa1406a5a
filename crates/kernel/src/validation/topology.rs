//! Loop validity for faces and manifold closure for volumes.

use std::collections::{BTreeMap, BTreeSet};

use crate::topology::entities::{Edge, EdgeId, Face, FaceId, VertexId, Volume};
use crate::topology::tools::extract_face_vertices;
use crate::traits::EntityLookup;

use super::types::TopologyError;

/// Check that a face's edges form one closed loop and return the loop's
/// ordered vertices.
///
/// Every touched vertex must have degree exactly 2 and the walk must visit at
/// least 3 vertices. Together these reject dangling chains, branching
/// vertices and disconnected edge sets.
pub fn check_face<L>(face: &Face, edges: &L) -> Result<Vec<VertexId>, TopologyError>
where
    L: EntityLookup<EdgeId, Edge>,
{
    if face.edges.len() < 3 {
        return Err(TopologyError::TooFewEdges {
            count: face.edges.len(),
        });
    }

    let mut degree: BTreeMap<VertexId, usize> = BTreeMap::new();
    for &edge_id in &face.edges {
        let edge = edges
            .lookup(edge_id)
            .ok_or(TopologyError::MissingEdge(edge_id))?;
        *degree.entry(edge.a).or_default() += 1;
        *degree.entry(edge.b).or_default() += 1;
    }

    if let Some((&vertex, &count)) = degree.iter().find(|&(_, &count)| count != 2) {
        return Err(TopologyError::VertexDegree {
            vertex,
            degree: count,
        });
    }

    let vertices = extract_face_vertices(face, edges)?;
    if vertices.len() < 3 {
        return Err(TopologyError::DegenerateLoop {
            vertices: vertices.len(),
        });
    }

    Ok(vertices)
}

pub fn is_valid_face<L>(face: &Face, edges: &L) -> bool
where
    L: EntityLookup<EdgeId, Edge>,
{
    check_face(face, edges).is_ok()
}

/// Check that a volume's faces close up: at least 4 distinct faces, and every
/// edge they reference is used by exactly two of them.
pub fn check_volume<L>(volume: &Volume, faces: &L) -> Result<(), TopologyError>
where
    L: EntityLookup<FaceId, Face>,
{
    if volume.faces.len() < 4 {
        return Err(TopologyError::TooFewFaces {
            count: volume.faces.len(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut usage: BTreeMap<EdgeId, usize> = BTreeMap::new();
    for &face_id in &volume.faces {
        if !seen.insert(face_id) {
            return Err(TopologyError::DuplicateFace(face_id));
        }
        let face = faces
            .lookup(face_id)
            .ok_or(TopologyError::MissingFace(face_id))?;
        for &edge_id in &face.edges {
            *usage.entry(edge_id).or_default() += 1;
        }
    }

    match usage.into_iter().find(|&(_, count)| count != 2) {
        Some((edge, count)) => Err(TopologyError::EdgeUsage { edge, count }),
        None => Ok(()),
    }
}

pub fn is_valid_volume<L>(volume: &Volume, faces: &L) -> bool
where
    L: EntityLookup<FaceId, Face>,
{
    check_volume(volume, faces).is_ok()
}
