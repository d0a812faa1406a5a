//! Acceptance checks for new entities.
//!
//! - **Topology**: face loop validity (degree-2 walk) and volume closure
//!   (every edge shared by exactly two faces).
//! - **Geometry**: colinearity and coplanarity predicates on vertex positions.

pub mod config;
pub mod geometry;
pub mod topology;
pub mod types;

pub use config::ValidationConfig;
pub use geometry::{are_colinear, are_coplanar, plane_normal};
pub use topology::{check_face, check_volume, is_valid_face, is_valid_volume};
pub use types::TopologyError;
