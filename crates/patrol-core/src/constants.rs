//! Simulation constants and tuning parameters.
//!
//! Per-run parameters live in [`crate::config::SimConfig`]; the values here
//! are fixed for every run.

// --- Timing ---

/// Default real-world duration of one tick (seconds).
pub const DEFAULT_TICK_DURATION_SECS: f64 = 0.150;

/// Default run length in ticks.
pub const DEFAULT_DURATION_TICKS: u64 = 3_000_000;

// --- World bounds ---

/// Default area width in meters.
pub const DEFAULT_WORLD_WIDTH: f64 = 1500.0;

/// Default area height in meters.
pub const DEFAULT_WORLD_HEIGHT: f64 = 1500.0;

/// Default number of grid cells along the x axis. 0 disables the grid.
pub const DEFAULT_GRID_CELLS: u32 = 3;

// --- Obstacles ---

/// Default number of random obstacles.
pub const DEFAULT_OBSTACLE_COUNT: usize = 10;

/// Shortest obstacle segment (meters, inclusive).
pub const OBSTACLE_MIN_LENGTH: u32 = 100;

/// Longest obstacle segment (meters, exclusive).
pub const OBSTACLE_MAX_LENGTH: u32 = 300;

/// Headings available to axis-aligned obstacles (degrees).
pub const ORTHOGONAL_ANGLES: [u32; 4] = [0, 90, 180, 270];

/// A unit closer than this to an obstacle after moving has collided (meters).
pub const COLLISION_NEAR_MISS: f64 = 1.0;

// --- Units ---

/// Default number of units.
pub const DEFAULT_UNIT_COUNT: usize = 2;

/// Default cruise speed (m/s).
pub const DEFAULT_UNIT_SPEED: f64 = 5.0;

/// Speed change per steering command (m/s).
pub const DEFAULT_SPEED_INCREMENT: f64 = 5.0;

/// Heading change per steering command (degrees).
pub const DEFAULT_ANGLE_INCREMENT: f64 = 45.0;

/// Default communication radius (meters).
pub const DEFAULT_COM_RANGE: f64 = 100.0;

/// Default sensing radius (meters).
pub const DEFAULT_SENSING_RANGE: f64 = 0.0;

/// Default radar radius (meters).
pub const DEFAULT_RADAR_RANGE: f64 = 60.0;

/// Default packet buffer capacity.
pub const DEFAULT_MAX_BUFFER: usize = 0;

/// Default battery capacity (abstract energy units).
pub const DEFAULT_MAX_ENERGY: f64 = 100.0;

/// Largest distance between a selection point and a unit for the unit to be picked (meters).
pub const DEFAULT_SELECT_TOLERANCE: f64 = 40.0;

// --- Base station ---

/// Default base station communication radius (meters).
pub const DEFAULT_BASE_STATION_COM_RANGE: f64 = 200.0;

/// Lateral tolerance for a unit to count as inside the depot channel (meters).
pub const DEPOT_CHANNEL_TOLERANCE: f64 = 1.0;

// --- Events ---

/// Default lifetime of a generated event (ticks).
pub const DEFAULT_EVENT_TTL_TICKS: u64 = 2000;
