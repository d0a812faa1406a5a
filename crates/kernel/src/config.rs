//! Model-wide configuration.

use crate::validation::ValidationConfig;

/// What `remove_*` does when other entities still reference the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Refuse with [`ModelError::InUse`](crate::ModelError::InUse).
    #[default]
    RejectIfReferenced,
    /// Erase regardless, leaving dangling handles in dependents.
    Unchecked,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelConfig {
    pub validation: ValidationConfig,
    pub removal: RemovalPolicy,
}
