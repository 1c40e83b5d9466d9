//! Error types for configuration and path loading.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration that cannot start a run.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tick duration must be positive, got {0}")]
    NonPositiveTickDuration(f64),

    #[error("world size must be positive, got {width}x{height}")]
    NonPositiveWorld { width: f64, height: f64 },

    #[error("at least one unit is required")]
    NoUnits,

    #[error("unit speed must not be negative, got {0}")]
    NegativeSpeed(f64),

    #[error("{cells} grid cells leave a zero cell size on a {width} m wide area")]
    GridTooFine { cells: u32, width: f64 },

    #[error("target ({x}, {y}) lies outside the area")]
    TargetOutOfBounds { x: f64, y: f64 },
}

/// Failure to obtain a unit's waypoint sequence.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("failed to read tour file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tour file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed waypoint {0:?}, expected \"(x, y)\"")]
    Waypoint(String),

    #[error("malformed unit index {0:?}")]
    UnitIndex(String),

    #[error("no path for unit {0}")]
    MissingUnit(u32),
}
