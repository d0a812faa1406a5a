//! Boundary-representation modeling kernel.
//!
//! A [`Model`] owns vertices, edges, faces and volumes in stable-handle
//! stores and runs every creation through the topology and geometry
//! validators. Straight edges and planar polygonal faces only.

pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod topology;
pub mod traits;
pub mod validation;

pub use config::{ModelConfig, RemovalPolicy};
pub use error::{EntityRef, ModelError, Rejection};
pub use geometry::{Point3d, Vec3};
pub use model::Model;
pub use topology::{
    Edge, EdgeId, EntityKey, EntityStore, Face, FaceId, Vertex, VertexId, Volume, VolumeId,
};
pub use traits::EntityLookup;

/// Epsilon for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Magnitudes below this are treated as zero.
    pub epsilon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { epsilon: 1e-4 }
    }
}

impl Tolerance {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() < self.epsilon
    }

    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        self.is_zero((*a - *b).length_squared())
    }
}
