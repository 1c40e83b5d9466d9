//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in world space (meters).
/// x grows East, y grows North; the origin is the lower-left corner of the area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Extent of the bounded area. Valid coordinates lie in `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

/// Read-only view of the global parameters a per-tick call may need.
///
/// Built by the engine and handed down by reference; leaf entities never
/// keep a pointer back to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimContext {
    pub time: SimTime,
    /// Real-world seconds covered by one tick.
    pub tick_duration_secs: f64,
    pub bounds: WorldBounds,
}

impl Coords {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Coords) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Coords {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<(f64, f64)> for Coords {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

impl WorldBounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp a point into the area. Overshoot past a wall is truncated.
    pub fn clamp(&self, coords: Coords) -> Coords {
        Coords::new(
            coords.x.clamp(0.0, self.width),
            coords.y.clamp(0.0, self.height),
        )
    }

    pub fn contains(&self, coords: &Coords) -> bool {
        (0.0..=self.width).contains(&coords.x) && (0.0..=self.height).contains(&coords.y)
    }
}

impl SimContext {
    /// Distance covered in one tick at the given speed (m/s).
    pub fn step_distance(&self, speed: f64) -> f64 {
        speed * self.tick_duration_secs
    }
}
