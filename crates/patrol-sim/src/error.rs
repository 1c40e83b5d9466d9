//! Errors raised while building or querying a simulation.

use thiserror::Error;

use patrol_core::error::{ConfigError, PathError};

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Path(#[from] PathError),

    /// A unit cannot exist without at least one waypoint.
    #[error("unit {unit} has an empty path")]
    EmptyPath { unit: u32 },

    #[error("no unit with index {0}")]
    UnknownUnit(u32),

    #[error("no target with index {0}")]
    UnknownTarget(u32),
}
