use thiserror::Error;

use super::config::ConfigError;
use crate::core::constraints::ConstraintError;
use crate::core::models::system::ModelError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Group '{0}' not found in particle system")]
    GroupNotFound(String),

    #[error("Group '{0}' contains no particles")]
    EmptyGroup(String),

    #[error("Ghost region '{role}' does not fit a system of {size} particles: {reason}")]
    GhostRegion {
        role: String,
        size: usize,
        reason: String,
    },

    #[error("Constraint failed on particle {index}: {source}")]
    Constraint {
        index: usize,
        #[source]
        source: ConstraintError,
    },

    #[error("Force projection failed: {source}")]
    ForceField {
        #[source]
        source: ConstraintError,
    },

    #[error("Particle system error: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("Snapshot at step {step} could not be written: {message}")]
    Snapshot { step: u64, message: String },
}
