//! The closed set of reversible model edits.
//!
//! Each command stores its construction parameters plus whatever it captures
//! while executing, which is exactly what its undo needs. Handles are kept
//! stable across undo/redo: a creation re-occupies the handle it was first
//! given, and a removal is undone by restoring at the removed handle.

use brep_kernel::{
    Edge, EdgeId, EntityRef, Face, FaceId, Model, ModelError, Point3d, Vec3, Vertex, VertexId,
    Volume, VolumeId,
};
use tracing::debug;

/// A model edit that can be applied and reverted.
pub trait Reversible {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError>;
    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError>;
}

// ─── Vertex ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CreateVertex {
    pub position: Point3d,
    assigned: Option<VertexId>,
    created: Option<VertexId>,
}

impl CreateVertex {
    pub fn new(position: Point3d) -> Self {
        Self {
            position,
            assigned: None,
            created: None,
        }
    }

    /// The vertex this command currently has live in the model.
    pub fn created(&self) -> Option<VertexId> {
        self.created
    }
}

impl Reversible for CreateVertex {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        let vertex = Vertex::new(self.position);
        let id = match self.assigned {
            Some(id) => {
                model.restore_vertex(id, vertex)?;
                id
            }
            None => model.create_vertex(self.position),
        };
        self.assigned = Some(id);
        self.created = Some(id);
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(id) = self.created {
            model.remove_vertex(id)?;
            self.created = None;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveVertex {
    pub id: VertexId,
    removed: Option<Vertex>,
}

impl RemoveVertex {
    pub fn new(id: VertexId) -> Self {
        Self { id, removed: None }
    }
}

impl Reversible for RemoveVertex {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        self.removed = Some(model.remove_vertex(self.id)?);
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(vertex) = self.removed {
            model.restore_vertex(self.id, vertex)?;
            self.removed = None;
        }
        Ok(())
    }
}

// ─── Edge ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CreateEdge {
    pub a: VertexId,
    pub b: VertexId,
    assigned: Option<EdgeId>,
    created: Option<EdgeId>,
}

impl CreateEdge {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self {
            a,
            b,
            assigned: None,
            created: None,
        }
    }

    pub fn created(&self) -> Option<EdgeId> {
        self.created
    }
}

impl Reversible for CreateEdge {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        let id = match self.assigned {
            Some(id) => {
                model.restore_edge(id, Edge::new(self.a, self.b))?;
                id
            }
            None => model.create_edge(self.a, self.b)?,
        };
        self.assigned = Some(id);
        self.created = Some(id);
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(id) = self.created {
            model.remove_edge(id)?;
            self.created = None;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveEdge {
    pub id: EdgeId,
    removed: Option<Edge>,
}

impl RemoveEdge {
    pub fn new(id: EdgeId) -> Self {
        Self { id, removed: None }
    }
}

impl Reversible for RemoveEdge {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        self.removed = Some(model.remove_edge(self.id)?);
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(edge) = self.removed {
            model.restore_edge(self.id, edge)?;
            self.removed = None;
        }
        Ok(())
    }
}

// ─── Face ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CreateFace {
    pub edges: Vec<EdgeId>,
    assigned: Option<FaceId>,
    created: Option<FaceId>,
}

impl CreateFace {
    pub fn new(edges: Vec<EdgeId>) -> Self {
        Self {
            edges,
            assigned: None,
            created: None,
        }
    }

    pub fn created(&self) -> Option<FaceId> {
        self.created
    }
}

impl Reversible for CreateFace {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        let id = match self.assigned {
            Some(id) => {
                model.restore_face(id, Face::new(self.edges.clone()))?;
                id
            }
            None => model.create_face(&self.edges)?,
        };
        self.assigned = Some(id);
        self.created = Some(id);
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(id) = self.created {
            model.remove_face(id)?;
            self.created = None;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveFace {
    pub id: FaceId,
    removed: Option<Face>,
}

impl RemoveFace {
    pub fn new(id: FaceId) -> Self {
        Self { id, removed: None }
    }
}

impl Reversible for RemoveFace {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        self.removed = Some(model.remove_face(self.id)?);
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(face) = &self.removed {
            model.restore_face(self.id, face.clone())?;
            self.removed = None;
        }
        Ok(())
    }
}

/// Translate a face's loop vertices by `delta`.
///
/// The original positions are captured on the first successful capture and
/// reused for every later redo; undo writes them back verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudeFace {
    pub face: FaceId,
    pub delta: Vec3,
    original: Vec<(VertexId, Point3d)>,
    applied: bool,
}

impl ExtrudeFace {
    pub fn new(face: FaceId, delta: Vec3) -> Self {
        Self {
            face,
            delta,
            original: Vec::new(),
            applied: false,
        }
    }

    fn capture(&mut self, model: &Model) -> Result<(), ModelError> {
        let captured = model
            .face_vertex_ids(self.face)?
            .into_iter()
            .map(|id| model.vertex(id).map(|v| (id, v.position)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(face = %self.face, vertices = captured.len(), "captured pre-extrusion positions");
        self.original = captured;
        Ok(())
    }
}

impl Reversible for ExtrudeFace {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if self.original.is_empty() {
            self.capture(model)?;
        }
        model.extrude_face(self.face, self.delta)?;
        self.applied = true;
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if !self.applied {
            return Ok(());
        }
        for &(id, position) in &self.original {
            if model.contains_vertex(id) {
                model.set_vertex_position(id, position)?;
            }
        }
        self.applied = false;
        Ok(())
    }
}

// ─── Volume ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CreateVolume {
    pub faces: Vec<FaceId>,
    assigned: Option<VolumeId>,
    created: Option<VolumeId>,
}

impl CreateVolume {
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self {
            faces,
            assigned: None,
            created: None,
        }
    }

    pub fn created(&self) -> Option<VolumeId> {
        self.created
    }
}

impl Reversible for CreateVolume {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        let id = match self.assigned {
            Some(id) => {
                model.restore_volume(id, Volume::new(self.faces.clone()))?;
                id
            }
            None => model.create_volume(&self.faces)?,
        };
        self.assigned = Some(id);
        self.created = Some(id);
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(id) = self.created {
            model.remove_volume(id)?;
            self.created = None;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveVolume {
    pub id: VolumeId,
    removed: Option<Volume>,
}

impl RemoveVolume {
    pub fn new(id: VolumeId) -> Self {
        Self { id, removed: None }
    }
}

impl Reversible for RemoveVolume {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        self.removed = Some(model.remove_volume(self.id)?);
        Ok(())
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(volume) = &self.removed {
            model.restore_volume(self.id, volume.clone())?;
            self.removed = None;
        }
        Ok(())
    }
}

// ─── Command ─────────────────────────────────────────────────────────────────

/// A recorded edit. Dispatch is a plain `match`; the set is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateVertex(CreateVertex),
    RemoveVertex(RemoveVertex),
    CreateEdge(CreateEdge),
    RemoveEdge(RemoveEdge),
    CreateFace(CreateFace),
    RemoveFace(RemoveFace),
    ExtrudeFace(ExtrudeFace),
    CreateVolume(CreateVolume),
    RemoveVolume(RemoveVolume),
}

impl Command {
    pub fn create_vertex(position: Point3d) -> Self {
        Command::CreateVertex(CreateVertex::new(position))
    }

    pub fn remove_vertex(id: VertexId) -> Self {
        Command::RemoveVertex(RemoveVertex::new(id))
    }

    pub fn create_edge(a: VertexId, b: VertexId) -> Self {
        Command::CreateEdge(CreateEdge::new(a, b))
    }

    pub fn remove_edge(id: EdgeId) -> Self {
        Command::RemoveEdge(RemoveEdge::new(id))
    }

    pub fn create_face(edges: impl Into<Vec<EdgeId>>) -> Self {
        Command::CreateFace(CreateFace::new(edges.into()))
    }

    pub fn remove_face(id: FaceId) -> Self {
        Command::RemoveFace(RemoveFace::new(id))
    }

    pub fn extrude_face(face: FaceId, delta: Vec3) -> Self {
        Command::ExtrudeFace(ExtrudeFace::new(face, delta))
    }

    pub fn create_volume(faces: impl Into<Vec<FaceId>>) -> Self {
        Command::CreateVolume(CreateVolume::new(faces.into()))
    }

    pub fn remove_volume(id: VolumeId) -> Self {
        Command::RemoveVolume(RemoveVolume::new(id))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateVertex(_) => "create_vertex",
            Command::RemoveVertex(_) => "remove_vertex",
            Command::CreateEdge(_) => "create_edge",
            Command::RemoveEdge(_) => "remove_edge",
            Command::CreateFace(_) => "create_face",
            Command::RemoveFace(_) => "remove_face",
            Command::ExtrudeFace(_) => "extrude_face",
            Command::CreateVolume(_) => "create_volume",
            Command::RemoveVolume(_) => "remove_volume",
        }
    }

    /// The entity a creation command currently has live in the model.
    pub fn created(&self) -> Option<EntityRef> {
        match self {
            Command::CreateVertex(c) => c.created().map(EntityRef::Vertex),
            Command::CreateEdge(c) => c.created().map(EntityRef::Edge),
            Command::CreateFace(c) => c.created().map(EntityRef::Face),
            Command::CreateVolume(c) => c.created().map(EntityRef::Volume),
            _ => None,
        }
    }
}

impl Reversible for Command {
    fn execute(&mut self, model: &mut Model) -> Result<(), ModelError> {
        match self {
            Command::CreateVertex(c) => c.execute(model),
            Command::RemoveVertex(c) => c.execute(model),
            Command::CreateEdge(c) => c.execute(model),
            Command::RemoveEdge(c) => c.execute(model),
            Command::CreateFace(c) => c.execute(model),
            Command::RemoveFace(c) => c.execute(model),
            Command::ExtrudeFace(c) => c.execute(model),
            Command::CreateVolume(c) => c.execute(model),
            Command::RemoveVolume(c) => c.execute(model),
        }
    }

    fn undo(&mut self, model: &mut Model) -> Result<(), ModelError> {
        match self {
            Command::CreateVertex(c) => c.undo(model),
            Command::RemoveVertex(c) => c.undo(model),
            Command::CreateEdge(c) => c.undo(model),
            Command::RemoveEdge(c) => c.undo(model),
            Command::CreateFace(c) => c.undo(model),
            Command::RemoveFace(c) => c.undo(model),
            Command::ExtrudeFace(c) => c.undo(model),
            Command::CreateVolume(c) => c.undo(model),
            Command::RemoveVolume(c) => c.undo(model),
        }
    }
}

macro_rules! impl_from_command {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Command {
                fn from(command: $variant) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_from_command!(
    CreateVertex,
    RemoveVertex,
    CreateEdge,
    RemoveEdge,
    CreateFace,
    RemoveFace,
    ExtrudeFace,
    CreateVolume,
    RemoveVolume,
);
