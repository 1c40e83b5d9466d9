//! Simulation engine for patrol runs.
//!
//! Owns the hecs ECS world holding units and base stations, runs the
//! per-tick systems, and produces EnvironmentSnapshots for a renderer.

pub mod depot;
pub mod engine;
pub mod error;
pub mod paths;
pub mod systems;
pub mod world_setup;

pub use patrol_core as core;
pub use patrol_grid as grid;

pub use engine::PatrolEngine;
pub use error::SimError;
pub use paths::{FixedStart, HandcraftedPaths, InMemoryPaths, PathProvider, TourFile};

#[cfg(test)]
mod tests;
