//! Entities, handles and the stores that own them.

pub mod entities;
pub mod store;
pub mod tools;

pub use entities::*;
pub use store::{DirtyStore, EntityKey, EntityStore, StoreError};
pub use tools::{extract_face_vertices, extract_volume_vertices, face_vertex_set};
