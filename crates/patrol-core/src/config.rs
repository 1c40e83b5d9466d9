//! Per-run simulation configuration.
//!
//! A `SimConfig` is built once, validated, and handed by value to the engine.
//! Nothing mutates it afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::{Coords, WorldBounds};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Real-world seconds covered by one tick.
    pub tick_duration_secs: f64,
    /// Number of ticks in a run.
    pub duration_ticks: u64,
    /// Area width in meters.
    pub width: f64,
    /// Area height in meters.
    pub height: f64,
    pub unit_count: usize,
    pub obstacle_count: usize,
    /// Restrict obstacle headings to multiples of 90 degrees.
    pub orthogonal_obstacles: bool,
    /// Number of grid cells along x. 0 disables every grid feature.
    pub grid_cells: u32,
    /// Start point for free movement. `None` means units follow their paths.
    pub free_movement_start: Option<Coords>,
    /// Cruise speed of path-following units (m/s).
    pub unit_speed: f64,
    /// Initial heading (degrees).
    pub unit_angle_deg: f64,
    pub speed_increment: f64,
    pub angle_increment_deg: f64,
    pub com_range: f64,
    pub sensing_range: f64,
    pub radar_range: f64,
    pub max_buffer: usize,
    pub max_energy: f64,
    pub base_station_coords: Coords,
    pub base_station_com_range: f64,
    pub target_coords: Vec<Coords>,
    /// Ticks between generated events. 0 disables event generation.
    pub event_interval_ticks: u64,
    pub event_ttl_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_duration_secs: DEFAULT_TICK_DURATION_SECS,
            duration_ticks: DEFAULT_DURATION_TICKS,
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            unit_count: DEFAULT_UNIT_COUNT,
            obstacle_count: DEFAULT_OBSTACLE_COUNT,
            orthogonal_obstacles: false,
            grid_cells: DEFAULT_GRID_CELLS,
            free_movement_start: Some(Coords::new(
                DEFAULT_WORLD_WIDTH / 2.0,
                DEFAULT_WORLD_HEIGHT,
            )),
            unit_speed: DEFAULT_UNIT_SPEED,
            unit_angle_deg: 0.0,
            speed_increment: DEFAULT_SPEED_INCREMENT,
            angle_increment_deg: DEFAULT_ANGLE_INCREMENT,
            com_range: DEFAULT_COM_RANGE,
            sensing_range: DEFAULT_SENSING_RANGE,
            radar_range: DEFAULT_RADAR_RANGE,
            max_buffer: DEFAULT_MAX_BUFFER,
            max_energy: DEFAULT_MAX_ENERGY,
            base_station_coords: Coords::new(DEFAULT_WORLD_WIDTH / 2.0, 0.0),
            base_station_com_range: DEFAULT_BASE_STATION_COM_RANGE,
            target_coords: vec![Coords::new(750.0, 750.0)],
            event_interval_ticks: 0,
            event_ttl_ticks: DEFAULT_EVENT_TTL_TICKS,
        }
    }
}

impl SimConfig {
    /// Decode a config from JSON. Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and decode a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check the invariants a run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_duration_secs > 0.0) {
            return Err(ConfigError::NonPositiveTickDuration(self.tick_duration_secs));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::NonPositiveWorld {
                width: self.width,
                height: self.height,
            });
        }
        if self.unit_count == 0 {
            return Err(ConfigError::NoUnits);
        }
        if self.unit_speed < 0.0 {
            return Err(ConfigError::NegativeSpeed(self.unit_speed));
        }
        if self.grid_cells > 0 && self.grid_cell_size() <= 0.0 {
            return Err(ConfigError::GridTooFine {
                cells: self.grid_cells,
                width: self.width,
            });
        }
        let bounds = self.bounds();
        if let Some(c) = self.target_coords.iter().find(|c| !bounds.contains(c)) {
            return Err(ConfigError::TargetOutOfBounds { x: c.x, y: c.y });
        }
        Ok(())
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.width, self.height)
    }

    /// Side of a grid cell in meters, or 0.0 when the grid is disabled.
    pub fn grid_cell_size(&self) -> f64 {
        if self.grid_cells == 0 {
            return 0.0;
        }
        (self.width / self.grid_cells as f64).floor()
    }

    /// Whether units steer freely instead of following their paths.
    pub fn is_free_movement(&self) -> bool {
        self.free_movement_start.is_some()
    }

    /// Run length in seconds.
    pub fn simulation_duration_secs(&self) -> f64 {
        self.duration_ticks as f64 * self.tick_duration_secs
    }

    /// Short label identifying the run's parameters.
    pub fn simulation_name(&self) -> String {
        format!("seed{}-units{}", self.seed, self.unit_count)
    }
}
