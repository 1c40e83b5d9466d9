//! Environment snapshot: the complete visible state handed to a renderer each tick.

use serde::{Deserialize, Serialize};

use crate::components::{Event, Obstacle};
use crate::entity::EntityId;
use crate::types::{Coords, SimTime};

/// Complete environment state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub time: SimTime,
    pub width: f64,
    pub height: f64,
    /// Side of a grid cell, 0.0 when the grid is disabled.
    pub grid_cell_size: f64,
    pub units: Vec<UnitView>,
    pub base_stations: Vec<BaseStationView>,
    pub obstacles: Vec<Obstacle>,
    pub targets: Vec<TargetView>,
    pub valid_events: Vec<Event>,
}

/// A unit as drawn on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: EntityId,
    pub coords: Coords,
    pub previous_coords: Coords,
    /// Heading (degrees).
    pub angle_deg: f64,
    /// Speed (m/s).
    pub speed: f64,
    pub buffer_len: usize,
    /// Waypoint the unit is heading to.
    pub next_waypoint: Coords,
    pub com_range: f64,
    pub radar_range: f64,
    /// Battery capacity.
    pub max_energy: f64,
    /// Whether steering commands currently apply to this unit.
    pub selected: bool,
}

/// A base station as drawn on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStationView {
    pub id: EntityId,
    pub coords: Coords,
    pub com_range: f64,
    pub buffer_len: usize,
}

/// A target with its current freshness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub id: EntityId,
    pub coords: Coords,
    /// Seconds since the last visit.
    pub age_of_information: f64,
    /// `1 - age / tolerance`; negative once past tolerance.
    pub residual_of_information: f64,
}
