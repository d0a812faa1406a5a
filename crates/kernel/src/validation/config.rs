//! Configuration for the acceptance checks run by the model.

use crate::Tolerance;

#[derive(Debug, Clone, Copy)]
pub struct ValidationConfig {
    /// Epsilon used by the geometric predicates.
    pub tolerance: Tolerance,
    /// Reject faces whose loop vertices are not coplanar.
    pub require_coplanar_faces: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            require_coplanar_faces: true,
        }
    }
}

impl ValidationConfig {
    /// Topology checks only; faces may be warped.
    pub fn topology_only() -> Self {
        Self {
            require_coplanar_faces: false,
            ..Self::default()
        }
    }
}
