use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::config::{ModelConfig, RemovalPolicy};
use crate::error::{EntityRef, ModelError, Rejection};
use crate::geometry::{Point3d, Vec3};
use crate::topology::entities::*;
use crate::topology::store::{DirtyStore, StoreError};
use crate::topology::tools::{extract_face_vertices, extract_volume_vertices, face_vertex_set};
use crate::validation::{are_coplanar, check_face, check_volume, TopologyError};

/// The B-rep model: sole owner of all entity data.
///
/// Every creation is validated before anything is inserted, so a rejected
/// call leaves the model untouched. Each entity kind carries a dirty flag
/// that is raised by any structural change and lowered by
/// [`reset_dirty_flags`](Self::reset_dirty_flags).
///
/// There are no back-references from vertices to edges, edges to faces or
/// faces to volumes. Reference checks on removal are linear scans.
#[derive(Debug, Clone, Default)]
pub struct Model {
    config: ModelConfig,
    vertices: DirtyStore<VertexId, Vertex>,
    edges: DirtyStore<EdgeId, Edge>,
    faces: DirtyStore<FaceId, Face>,
    volumes: DirtyStore<VolumeId, Volume>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // ─── Vertex ──────────────────────────────────────────────────────────────

    #[instrument(skip(self, position), fields(position = ?position.to_array()))]
    pub fn create_vertex(&mut self, position: Point3d) -> VertexId {
        let id = self.vertices.insert(Vertex::new(position));
        debug!(%id, "created vertex");
        id
    }

    /// Put a previously removed vertex back under its old handle.
    pub fn restore_vertex(&mut self, id: VertexId, vertex: Vertex) -> Result<(), ModelError> {
        self.vertices
            .restore(id, vertex)
            .map_err(|err| store_error(EntityRef::Vertex(id), err))?;
        debug!(%id, "restored vertex");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<Vertex, ModelError> {
        if !self.vertices.contains(id) {
            return Err(ModelError::NotFound(EntityRef::Vertex(id)));
        }
        if self.config.removal == RemovalPolicy::RejectIfReferenced {
            if let Some((edge_id, _)) = self.edges.iter().find(|(_, e)| e.touches(id)) {
                return Err(ModelError::InUse {
                    entity: EntityRef::Vertex(id),
                    referenced_by: EntityRef::Edge(edge_id),
                });
            }
        }
        let vertex = self
            .vertices
            .remove(id)
            .map_err(|err| store_error(EntityRef::Vertex(id), err))?;
        debug!(%id, "removed vertex");
        Ok(vertex)
    }

    pub fn vertex(&self, id: VertexId) -> Result<&Vertex, ModelError> {
        self.vertices
            .get(id)
            .map_err(|err| store_error(EntityRef::Vertex(id), err))
    }

    /// Move a vertex, returning its previous position.
    ///
    /// Faces touching the vertex are not re-validated.
    pub fn set_vertex_position(
        &mut self,
        id: VertexId,
        position: Point3d,
    ) -> Result<Point3d, ModelError> {
        let vertex = self
            .vertices
            .get_mut(id)
            .map_err(|err| store_error(EntityRef::Vertex(id), err))?;
        Ok(std::mem::replace(&mut vertex.position, position))
    }

    // ─── Edge ────────────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn create_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, ModelError> {
        self.validate_edge(a, b)?;
        let id = self.edges.insert(Edge::new(a, b));
        debug!(%id, "created edge");
        Ok(id)
    }

    pub fn restore_edge(&mut self, id: EdgeId, edge: Edge) -> Result<(), ModelError> {
        if self.edges.contains(id) {
            return Err(ModelError::Occupied(EntityRef::Edge(id)));
        }
        self.validate_edge(edge.a, edge.b)?;
        self.edges
            .restore(id, edge)
            .map_err(|err| store_error(EntityRef::Edge(id), err))?;
        debug!(%id, "restored edge");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, ModelError> {
        if !self.edges.contains(id) {
            return Err(ModelError::NotFound(EntityRef::Edge(id)));
        }
        if self.config.removal == RemovalPolicy::RejectIfReferenced {
            if let Some((face_id, _)) = self.faces.iter().find(|(_, f)| f.edges.contains(&id)) {
                return Err(ModelError::InUse {
                    entity: EntityRef::Edge(id),
                    referenced_by: EntityRef::Face(face_id),
                });
            }
        }
        let edge = self
            .edges
            .remove(id)
            .map_err(|err| store_error(EntityRef::Edge(id), err))?;
        debug!(%id, "removed edge");
        Ok(edge)
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, ModelError> {
        self.edges
            .get(id)
            .map_err(|err| store_error(EntityRef::Edge(id), err))
    }

    /// The edge joining `a` and `b` in either direction, if any.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edges
            .iter()
            .find(|(_, e)| e.connects(a, b))
            .map(|(id, _)| id)
    }

    // ─── Face ────────────────────────────────────────────────────────────────

    /// Create a face from edges listed in walk order.
    ///
    /// Edges are stored in the order given.
    #[instrument(skip(self))]
    pub fn create_face(&mut self, edges: &[EdgeId]) -> Result<FaceId, ModelError> {
        let face = Face::new(edges.to_vec());
        self.validate_face(&face)?;
        let id = self.faces.insert(face);
        debug!(%id, edges = edges.len(), "created face");
        Ok(id)
    }

    pub fn restore_face(&mut self, id: FaceId, face: Face) -> Result<(), ModelError> {
        if self.faces.contains(id) {
            return Err(ModelError::Occupied(EntityRef::Face(id)));
        }
        self.validate_face(&face)?;
        self.faces
            .restore(id, face)
            .map_err(|err| store_error(EntityRef::Face(id), err))?;
        debug!(%id, "restored face");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn remove_face(&mut self, id: FaceId) -> Result<Face, ModelError> {
        if !self.faces.contains(id) {
            return Err(ModelError::NotFound(EntityRef::Face(id)));
        }
        if self.config.removal == RemovalPolicy::RejectIfReferenced {
            if let Some((volume_id, _)) = self.volumes.iter().find(|(_, v)| v.faces.contains(&id)) {
                return Err(ModelError::InUse {
                    entity: EntityRef::Face(id),
                    referenced_by: EntityRef::Volume(volume_id),
                });
            }
        }
        let face = self
            .faces
            .remove(id)
            .map_err(|err| store_error(EntityRef::Face(id), err))?;
        debug!(%id, "removed face");
        Ok(face)
    }

    pub fn face(&self, id: FaceId) -> Result<&Face, ModelError> {
        self.faces
            .get(id)
            .map_err(|err| store_error(EntityRef::Face(id), err))
    }

    /// Ordered vertex loop of a stored face.
    pub fn face_vertices(&self, id: FaceId) -> Result<Vec<VertexId>, ModelError> {
        let face = self.face(id)?;
        extract_face_vertices(face, &self.edges).map_err(lookup_error)
    }

    /// Translate every vertex of a face's loop by `delta`.
    ///
    /// Returns the moved vertices. Either all of them move or none do.
    #[instrument(skip(self, delta), fields(delta = ?delta.to_array()))]
    pub fn extrude_face(&mut self, id: FaceId, delta: Vec3) -> Result<Vec<VertexId>, ModelError> {
        let affected = self.face_vertex_ids(id)?;
        if let Some(&missing) = affected.iter().find(|&&v| !self.vertices.contains(v)) {
            return Err(ModelError::NotFound(EntityRef::Vertex(missing)));
        }
        for &vertex_id in &affected {
            let vertex = self
                .vertices
                .get_mut(vertex_id)
                .map_err(|err| store_error(EntityRef::Vertex(vertex_id), err))?;
            vertex.position += delta;
        }
        debug!(%id, moved = affected.len(), "extruded face");
        Ok(affected.into_iter().collect())
    }

    /// Every distinct vertex touched by a face's edges.
    pub fn face_vertex_ids(&self, id: FaceId) -> Result<BTreeSet<VertexId>, ModelError> {
        let face = self.face(id)?;
        face_vertex_set(face, &self.edges).map_err(lookup_error)
    }

    // ─── Volume ──────────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn create_volume(&mut self, faces: &[FaceId]) -> Result<VolumeId, ModelError> {
        let volume = Volume::new(faces.to_vec());
        check_volume(&volume, &self.faces)?;
        let id = self.volumes.insert(volume);
        debug!(%id, faces = faces.len(), "created volume");
        Ok(id)
    }

    pub fn restore_volume(&mut self, id: VolumeId, volume: Volume) -> Result<(), ModelError> {
        if self.volumes.contains(id) {
            return Err(ModelError::Occupied(EntityRef::Volume(id)));
        }
        check_volume(&volume, &self.faces)?;
        self.volumes
            .restore(id, volume)
            .map_err(|err| store_error(EntityRef::Volume(id), err))?;
        debug!(%id, "restored volume");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn remove_volume(&mut self, id: VolumeId) -> Result<Volume, ModelError> {
        let volume = self
            .volumes
            .remove(id)
            .map_err(|err| store_error(EntityRef::Volume(id), err))?;
        debug!(%id, "removed volume");
        Ok(volume)
    }

    pub fn volume(&self, id: VolumeId) -> Result<&Volume, ModelError> {
        self.volumes
            .get(id)
            .map_err(|err| store_error(EntityRef::Volume(id), err))
    }

    /// Union of the vertex loops of a volume's faces.
    pub fn volume_vertices(&self, id: VolumeId) -> Result<BTreeSet<VertexId>, ModelError> {
        let volume = self.volume(id)?;
        extract_volume_vertices(volume, &self.faces, &self.edges).map_err(lookup_error)
    }

    // ─── Queries ─────────────────────────────────────────────────────────────

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains(id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(id)
    }

    pub fn contains_face(&self, id: FaceId) -> bool {
        self.faces.contains(id)
    }

    pub fn contains_volume(&self, id: VolumeId) -> bool {
        self.volumes.contains(id)
    }

    // ─── Dense views ─────────────────────────────────────────────────────────
    //
    // Packed in storage order, which changes on removal. `*_ids` is parallel
    // to the matching value slice; `*_dense_index` maps a handle into it.

    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.dense()
    }

    pub fn edges(&self) -> &[Edge] {
        self.edges.dense()
    }

    pub fn faces(&self) -> &[Face] {
        self.faces.dense()
    }

    pub fn volumes(&self) -> &[Volume] {
        self.volumes.dense()
    }

    pub fn vertex_ids(&self) -> &[VertexId] {
        self.vertices.ids()
    }

    pub fn edge_ids(&self) -> &[EdgeId] {
        self.edges.ids()
    }

    pub fn face_ids(&self) -> &[FaceId] {
        self.faces.ids()
    }

    pub fn volume_ids(&self) -> &[VolumeId] {
        self.volumes.ids()
    }

    pub fn vertex_dense_index(&self, id: VertexId) -> Result<u32, ModelError> {
        self.vertices
            .dense_index(id)
            .map_err(|err| store_error(EntityRef::Vertex(id), err))
    }

    pub fn edge_dense_index(&self, id: EdgeId) -> Result<u32, ModelError> {
        self.edges
            .dense_index(id)
            .map_err(|err| store_error(EntityRef::Edge(id), err))
    }

    pub fn face_dense_index(&self, id: FaceId) -> Result<u32, ModelError> {
        self.faces
            .dense_index(id)
            .map_err(|err| store_error(EntityRef::Face(id), err))
    }

    pub fn volume_dense_index(&self, id: VolumeId) -> Result<u32, ModelError> {
        self.volumes
            .dense_index(id)
            .map_err(|err| store_error(EntityRef::Volume(id), err))
    }

    // ─── Dirty flags ─────────────────────────────────────────────────────────

    pub fn is_vertices_dirty(&self) -> bool {
        self.vertices.is_dirty()
    }

    pub fn is_edges_dirty(&self) -> bool {
        self.edges.is_dirty()
    }

    pub fn is_faces_dirty(&self) -> bool {
        self.faces.is_dirty()
    }

    pub fn is_volumes_dirty(&self) -> bool {
        self.volumes.is_dirty()
    }

    pub fn reset_dirty_flags(&mut self) {
        self.vertices.clear_dirty();
        self.edges.clear_dirty();
        self.faces.clear_dirty();
        self.volumes.clear_dirty();
    }

    /// True if any entity kind changed since the last reset.
    pub fn should_render(&self) -> bool {
        self.is_vertices_dirty()
            || self.is_edges_dirty()
            || self.is_faces_dirty()
            || self.is_volumes_dirty()
    }

    // ─── Validation ──────────────────────────────────────────────────────────

    fn validate_edge(&self, a: VertexId, b: VertexId) -> Result<(), Rejection> {
        if a == b {
            return Err(Rejection::SelfLoop(a));
        }
        for v in [a, b] {
            if !self.vertices.contains(v) {
                return Err(Rejection::MissingVertex(v));
            }
        }
        match self.find_edge(a, b) {
            Some(existing) => Err(Rejection::DuplicateEdge { a, b, existing }),
            None => Ok(()),
        }
    }

    fn validate_face(&self, face: &Face) -> Result<(), Rejection> {
        let loop_vertices = check_face(face, &self.edges)?;

        let positions: Vec<Point3d> = loop_vertices
            .iter()
            .map(|&v| {
                self.vertices
                    .get(v)
                    .map(|vertex| vertex.position)
                    .map_err(|_| Rejection::MissingVertex(v))
            })
            .collect::<Result<_, _>>()?;

        let validation = &self.config.validation;
        if validation.require_coplanar_faces && !are_coplanar(&positions, &validation.tolerance) {
            return Err(Rejection::NotCoplanar);
        }
        Ok(())
    }
}

fn store_error(entity: EntityRef, err: StoreError) -> ModelError {
    match err {
        StoreError::NotFound { .. } => ModelError::NotFound(entity),
        StoreError::Occupied { .. } => ModelError::Occupied(entity),
    }
}

/// Walking a stored entity only fails when one of its references dangles.
fn lookup_error(err: TopologyError) -> ModelError {
    match err {
        TopologyError::MissingEdge(id) => ModelError::NotFound(EntityRef::Edge(id)),
        TopologyError::MissingFace(id) => ModelError::NotFound(EntityRef::Face(id)),
        other => ModelError::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::store::EntityKey;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3d {
        Point3d::new(x, y, z)
    }

    /// Unit right triangle in the XY plane: (vertices, edges in walk order).
    fn triangle(model: &mut Model) -> ([VertexId; 3], [EdgeId; 3]) {
        let v0 = model.create_vertex(p(0.0, 0.0, 0.0));
        let v1 = model.create_vertex(p(1.0, 0.0, 0.0));
        let v2 = model.create_vertex(p(0.0, 1.0, 0.0));
        let e0 = model.create_edge(v0, v1).unwrap();
        let e1 = model.create_edge(v1, v2).unwrap();
        let e2 = model.create_edge(v2, v0).unwrap();
        ([v0, v1, v2], [e0, e1, e2])
    }

    struct Tetra {
        vertices: [VertexId; 4],
        edges: [EdgeId; 6],
        faces: [FaceId; 4],
    }

    fn tetrahedron(model: &mut Model) -> Tetra {
        let v0 = model.create_vertex(p(0.0, 0.0, 0.0));
        let v1 = model.create_vertex(p(1.0, 0.0, 0.0));
        let v2 = model.create_vertex(p(0.0, 1.0, 0.0));
        let v3 = model.create_vertex(p(0.0, 0.0, 1.0));

        let e01 = model.create_edge(v0, v1).unwrap();
        let e02 = model.create_edge(v0, v2).unwrap();
        let e03 = model.create_edge(v0, v3).unwrap();
        let e12 = model.create_edge(v1, v2).unwrap();
        let e13 = model.create_edge(v1, v3).unwrap();
        let e23 = model.create_edge(v2, v3).unwrap();

        let f0 = model.create_face(&[e01, e12, e02]).unwrap();
        let f1 = model.create_face(&[e01, e13, e03]).unwrap();
        let f2 = model.create_face(&[e02, e23, e03]).unwrap();
        let f3 = model.create_face(&[e12, e23, e13]).unwrap();

        Tetra {
            vertices: [v0, v1, v2, v3],
            edges: [e01, e02, e03, e12, e13, e23],
            faces: [f0, f1, f2, f3],
        }
    }

    #[test]
    fn test_create_vertex_inserts_vertex() {
        let mut model = Model::new();
        let id = model.create_vertex(p(1.0, 2.0, 3.0));
        assert!(model.contains_vertex(id));
        assert_eq!(model.vertex(id).unwrap().position, p(1.0, 2.0, 3.0));
        assert_eq!(model.vertices().len(), 1);
    }

    #[test]
    fn test_remove_vertex() {
        let mut model = Model::new();
        let id = model.create_vertex(p(1.0, 2.0, 3.0));
        let removed = model.remove_vertex(id).unwrap();
        assert_eq!(removed.position, p(1.0, 2.0, 3.0));
        assert!(!model.contains_vertex(id));
        assert_eq!(
            model.remove_vertex(id),
            Err(ModelError::NotFound(EntityRef::Vertex(id)))
        );
    }

    #[test]
    fn test_create_edge_rejects_self_loop() {
        let mut model = Model::new();
        let a = model.create_vertex(p(0.0, 0.0, 0.0));
        assert_eq!(
            model.create_edge(a, a),
            Err(ModelError::Rejected(Rejection::SelfLoop(a)))
        );
        assert!(model.edges().is_empty());
    }

    #[test]
    fn test_create_edge_rejects_missing_vertex() {
        let mut model = Model::new();
        let a = model.create_vertex(p(0.0, 0.0, 0.0));
        let ghost = VertexId::from_index(42);
        assert_eq!(
            model.create_edge(a, ghost),
            Err(ModelError::Rejected(Rejection::MissingVertex(ghost)))
        );
    }

    #[test]
    fn test_create_edge_rejects_duplicate_either_direction() {
        let mut model = Model::new();
        let a = model.create_vertex(p(0.0, 0.0, 0.0));
        let b = model.create_vertex(p(1.0, 0.0, 0.0));
        let e = model.create_edge(a, b).unwrap();

        for (x, y) in [(a, b), (b, a)] {
            assert_eq!(
                model.create_edge(x, y),
                Err(ModelError::Rejected(Rejection::DuplicateEdge {
                    a: x,
                    b: y,
                    existing: e
                }))
            );
        }
        assert_eq!(model.edges().len(), 1);
        assert_eq!(model.find_edge(b, a), Some(e));
    }

    #[test]
    fn test_create_face_triangle() {
        let mut model = Model::new();
        let (_, edges) = triangle(&mut model);
        let face = model.create_face(&edges).unwrap();
        assert!(model.contains_face(face));
        assert_eq!(model.face(face).unwrap().edges, edges.to_vec());
        assert_eq!(model.face_vertices(face).unwrap().len(), 3);
    }

    #[test]
    fn test_create_face_rejects_non_planar() {
        let mut model = Model::new();
        let v0 = model.create_vertex(p(0.0, 0.0, 0.0));
        let v1 = model.create_vertex(p(1.0, 0.0, 0.0));
        let v2 = model.create_vertex(p(0.0, 1.0, 0.0));
        let v3 = model.create_vertex(p(0.0, 1.0, 1.0));
        let e0 = model.create_edge(v0, v1).unwrap();
        let e1 = model.create_edge(v1, v2).unwrap();
        let e2 = model.create_edge(v2, v3).unwrap();
        let e3 = model.create_edge(v3, v0).unwrap();

        assert_eq!(
            model.create_face(&[e0, e1, e2, e3]),
            Err(ModelError::Rejected(Rejection::NotCoplanar))
        );
        assert!(model.faces().is_empty());
    }

    #[test]
    fn test_non_planar_face_allowed_when_configured() {
        let config = ModelConfig {
            validation: crate::validation::ValidationConfig::topology_only(),
            ..ModelConfig::default()
        };
        let mut model = Model::with_config(config);
        let v0 = model.create_vertex(p(0.0, 0.0, 0.0));
        let v1 = model.create_vertex(p(1.0, 0.0, 0.0));
        let v2 = model.create_vertex(p(0.0, 1.0, 0.0));
        let v3 = model.create_vertex(p(0.0, 1.0, 1.0));
        let e0 = model.create_edge(v0, v1).unwrap();
        let e1 = model.create_edge(v1, v2).unwrap();
        let e2 = model.create_edge(v2, v3).unwrap();
        let e3 = model.create_edge(v3, v0).unwrap();
        assert!(model.create_face(&[e0, e1, e2, e3]).is_ok());
    }

    #[test]
    fn test_create_face_coplanar_square() {
        let mut model = Model::new();
        let v0 = model.create_vertex(p(0.0, 0.0, 0.0));
        let v1 = model.create_vertex(p(1.0, 0.0, 0.0));
        let v2 = model.create_vertex(p(1.0, 1.0, 0.0));
        let v3 = model.create_vertex(p(0.0, 1.0, 0.0));
        let e0 = model.create_edge(v0, v1).unwrap();
        let e1 = model.create_edge(v1, v2).unwrap();
        let e2 = model.create_edge(v2, v3).unwrap();
        let e3 = model.create_edge(v3, v0).unwrap();

        assert!(model.create_face(&[e0, e2, e1, e3]).is_err());
        let face = model.create_face(&[e0, e1, e2, e3]).unwrap();
        assert_eq!(model.face_vertices(face).unwrap(), vec![v0, v1, v2, v3]);
    }

    #[test]
    fn test_create_face_rejects_two_edges() {
        let mut model = Model::new();
        let (_, [e0, e1, _]) = triangle(&mut model);
        assert_eq!(
            model.create_face(&[e0, e1]),
            Err(ModelError::Rejected(Rejection::Topology(
                TopologyError::TooFewEdges { count: 2 }
            )))
        );
    }

    #[test]
    fn test_create_face_rejects_missing_edge() {
        let mut model = Model::new();
        let (_, [e0, e1, _]) = triangle(&mut model);
        let ghost = EdgeId::from_index(99);
        assert_eq!(
            model.create_face(&[e0, e1, ghost]),
            Err(ModelError::Rejected(Rejection::Topology(
                TopologyError::MissingEdge(ghost)
            )))
        );
    }

    #[test]
    fn test_create_volume_tetrahedron() {
        let mut model = Model::new();
        let tetra = tetrahedron(&mut model);
        let volume = model.create_volume(&tetra.faces).unwrap();
        assert!(model.contains_volume(volume));
        assert_eq!(model.volume_vertices(volume).unwrap().len(), 4);
    }

    #[test]
    fn test_create_volume_rejects_three_faces() {
        let mut model = Model::new();
        let tetra = tetrahedron(&mut model);
        assert_eq!(
            model.create_volume(&tetra.faces[..3]),
            Err(ModelError::Rejected(Rejection::Topology(
                TopologyError::TooFewFaces { count: 3 }
            )))
        );
        // Padding the open shell with an unrelated face still leaves its
        // rim edges used only once.
        let (_, far_edges) = {
            let a = model.create_vertex(p(5.0, 0.0, 0.0));
            let b = model.create_vertex(p(6.0, 0.0, 0.0));
            let c = model.create_vertex(p(5.0, 1.0, 0.0));
            let edges = [
                model.create_edge(a, b).unwrap(),
                model.create_edge(b, c).unwrap(),
                model.create_edge(c, a).unwrap(),
            ];
            ([a, b, c], edges)
        };
        let far = model.create_face(&far_edges).unwrap();
        let padded = [tetra.faces[0], tetra.faces[1], tetra.faces[2], far];
        assert!(matches!(
            model.create_volume(&padded),
            Err(ModelError::Rejected(Rejection::Topology(
                TopologyError::EdgeUsage { count: 1, .. }
            )))
        ));
        assert!(model.volumes().is_empty());
    }

    #[test]
    fn test_iteration_counts() {
        let mut model = Model::new();
        model.create_vertex(p(0.0, 0.0, 0.0));
        model.create_vertex(p(1.0, 0.0, 0.0));
        assert_eq!(model.vertices().len(), 2);
        assert_eq!(model.edges().len(), 0);
        assert_eq!(model.faces().len(), 0);
        assert_eq!(model.volumes().len(), 0);
    }

    #[test]
    fn test_remove_rejected_while_referenced() {
        let mut model = Model::new();
        let tetra = tetrahedron(&mut model);
        let volume = model.create_volume(&tetra.faces).unwrap();

        assert!(matches!(
            model.remove_vertex(tetra.vertices[0]),
            Err(ModelError::InUse { referenced_by: EntityRef::Edge(_), .. })
        ));
        assert!(matches!(
            model.remove_edge(tetra.edges[0]),
            Err(ModelError::InUse { referenced_by: EntityRef::Face(_), .. })
        ));
        assert_eq!(
            model.remove_face(tetra.faces[0]),
            Err(ModelError::InUse {
                entity: EntityRef::Face(tetra.faces[0]),
                referenced_by: EntityRef::Volume(volume),
            })
        );

        model.remove_volume(volume).unwrap();
        model.remove_face(tetra.faces[0]).unwrap();
        assert!(model.contains_edge(tetra.edges[0]));
    }

    #[test]
    fn test_unchecked_removal_does_not_cascade() {
        let config = ModelConfig {
            removal: RemovalPolicy::Unchecked,
            ..ModelConfig::default()
        };
        let mut model = Model::with_config(config);
        let ([v0, ..], [e0, ..]) = triangle(&mut model);

        model.remove_vertex(v0).unwrap();
        assert!(model.contains_edge(e0));
        assert_eq!(model.edges().len(), 3);
    }

    #[test]
    fn test_restore_edge_keeps_handle() {
        let mut model = Model::new();
        let ([v0, v1, _], [e0, ..]) = triangle(&mut model);
        let edge = model.remove_edge(e0).unwrap();
        model.restore_edge(e0, edge).unwrap();
        assert_eq!(model.edge(e0).unwrap(), &Edge::new(v1, v0));
        assert_eq!(
            model.restore_edge(e0, edge),
            Err(ModelError::Occupied(EntityRef::Edge(e0)))
        );
    }

    #[test]
    fn test_restore_validates() {
        let mut model = Model::new();
        let (_, edges) = triangle(&mut model);
        let face = model.create_face(&edges).unwrap();
        let removed = model.remove_face(face).unwrap();
        let ghost = FaceId::from_index(face.index() + 1);

        let broken = Face::new(vec![edges[0], edges[2], edges[1], edges[0]]);
        assert!(matches!(
            model.restore_face(ghost, broken),
            Err(ModelError::Rejected(_))
        ));
        assert!(!model.contains_face(ghost));
        model.restore_face(face, removed).unwrap();
        assert!(model.contains_face(face));
    }

    #[test]
    fn test_extrude_face_moves_loop() {
        let mut model = Model::new();
        let ([v0, v1, v2], edges) = triangle(&mut model);
        let face = model.create_face(&edges).unwrap();
        let bystander = model.create_vertex(p(5.0, 5.0, 5.0));

        let moved = model.extrude_face(face, Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(moved.len(), 3);
        for v in [v0, v1, v2] {
            assert_relative_eq!(model.vertex(v).unwrap().position.z, 2.0);
        }
        assert_eq!(model.vertex(bystander).unwrap().position, p(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_extrude_missing_face() {
        let mut model = Model::new();
        let ghost = FaceId::from_index(3);
        assert_eq!(
            model.extrude_face(ghost, Vec3::Z),
            Err(ModelError::NotFound(EntityRef::Face(ghost)))
        );
    }

    #[test]
    fn test_set_vertex_position_returns_previous() {
        let mut model = Model::new();
        let v = model.create_vertex(p(1.0, 1.0, 1.0));
        model.reset_dirty_flags();
        let old = model.set_vertex_position(v, p(2.0, 2.0, 2.0)).unwrap();
        assert_eq!(old, p(1.0, 1.0, 1.0));
        assert!(model.is_vertices_dirty());
    }

    #[test]
    fn test_restore_unissued_handle_rejected() {
        let mut model = Model::new();
        let far = VertexId::from_index(20_000_000);
        assert_eq!(
            model.restore_vertex(far, Vertex::new(p(0.0, 0.0, 0.0))),
            Err(ModelError::NotFound(EntityRef::Vertex(far)))
        );
        assert!(model.vertices().is_empty());
        assert_eq!(model.create_vertex(p(1.0, 0.0, 0.0)).index(), 0);
    }

    #[test]
    fn test_failed_mutations_keep_flags_clean() {
        let mut model = Model::new();
        let v = model.create_vertex(p(0.0, 0.0, 0.0));
        model.reset_dirty_flags();

        assert_eq!(
            model.restore_vertex(v, Vertex::new(p(1.0, 1.0, 1.0))),
            Err(ModelError::Occupied(EntityRef::Vertex(v)))
        );
        let ghost = VertexId::from_index(7);
        assert!(model.restore_vertex(ghost, Vertex::new(p(1.0, 1.0, 1.0))).is_err());
        assert!(model.set_vertex_position(ghost, p(1.0, 1.0, 1.0)).is_err());
        assert!(model.remove_vertex(ghost).is_err());
        assert!(!model.should_render());
    }

    #[test]
    fn test_dirty_flags_follow_mutations() {
        let mut model = Model::new();
        assert!(!model.should_render());

        let (_, edges) = triangle(&mut model);
        assert!(model.is_vertices_dirty());
        assert!(model.is_edges_dirty());
        assert!(!model.is_faces_dirty());
        assert!(model.should_render());

        model.reset_dirty_flags();
        assert!(!model.should_render());

        // Rejected creations do not touch storage.
        assert!(model.create_face(&edges[..2]).is_err());
        assert!(!model.should_render());

        // Reads do not either.
        let _ = model.vertices();
        let _ = model.edge(edges[0]);
        assert!(!model.should_render());

        model.create_face(&edges).unwrap();
        assert!(model.is_faces_dirty());
        assert!(!model.is_vertices_dirty());
        assert!(!model.is_volumes_dirty());
    }

    #[test]
    fn test_dense_index_maps_into_views() {
        let mut model = Model::new();
        let a = model.create_vertex(p(0.0, 0.0, 0.0));
        let b = model.create_vertex(p(1.0, 0.0, 0.0));
        let c = model.create_vertex(p(2.0, 0.0, 0.0));
        model.remove_vertex(a).unwrap();

        for id in [b, c] {
            let index = model.vertex_dense_index(id).unwrap() as usize;
            assert_eq!(model.vertex_ids()[index], id);
            assert_eq!(model.vertices()[index], *model.vertex(id).unwrap());
        }
        assert_eq!(
            model.vertex_dense_index(a),
            Err(ModelError::NotFound(EntityRef::Vertex(a)))
        );
    }
}
