//! Snapshot system: queries the ECS world and builds a complete EnvironmentSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::{Entity, World};

use patrol_core::components::*;
use patrol_core::state::*;
use patrol_core::types::{SimTime, WorldBounds};

use crate::systems::freshness;

/// Everything the snapshot needs besides the ECS world.
pub struct SnapshotInputs<'a> {
    pub time: SimTime,
    pub tick_duration_secs: f64,
    pub bounds: WorldBounds,
    pub grid_cell_size: f64,
    /// Units in spawn order.
    pub units: &'a [Entity],
    pub base_stations: &'a [Entity],
    pub selected: Option<Entity>,
    pub obstacles: &'a [Obstacle],
    pub targets: &'a [Target],
    pub events: &'a [Event],
}

/// Build a complete EnvironmentSnapshot from the current state.
pub fn build_snapshot(world: &World, inputs: &SnapshotInputs<'_>) -> EnvironmentSnapshot {
    let now = inputs.time.tick;

    EnvironmentSnapshot {
        time: inputs.time,
        width: inputs.bounds.width,
        height: inputs.bounds.height,
        grid_cell_size: inputs.grid_cell_size,
        units: build_units(world, inputs.units, inputs.selected),
        base_stations: build_base_stations(world, inputs.base_stations),
        obstacles: inputs.obstacles.to_vec(),
        targets: inputs
            .targets
            .iter()
            .map(|t| TargetView {
                id: t.id,
                coords: t.coords,
                age_of_information: freshness::age_of_information(
                    t,
                    now,
                    inputs.tick_duration_secs,
                ),
                residual_of_information: freshness::residual_of_information(
                    t,
                    now,
                    inputs.tick_duration_secs,
                ),
            })
            .collect(),
        valid_events: inputs
            .events
            .iter()
            .filter(|e| !e.is_expired(now))
            .copied()
            .collect(),
    }
}

/// Build UnitView list, in spawn order.
fn build_units(world: &World, units: &[Entity], selected: Option<Entity>) -> Vec<UnitView> {
    units
        .iter()
        .filter_map(|&entity| {
            let mut query = world
                .query_one::<(
                    &Tag,
                    &SpatialState,
                    &Motion,
                    &Waypoints,
                    &AntennaProfile,
                    &Battery,
                    &PacketBuffer,
                )>(entity)
                .ok()?;
            let (tag, state, motion, waypoints, antenna, battery, buffer) = query.get()?;
            Some(UnitView {
                id: tag.0,
                coords: state.coords,
                previous_coords: state.previous_coords,
                angle_deg: motion.angle_deg,
                speed: motion.speed,
                buffer_len: buffer.len(),
                next_waypoint: waypoints.target(),
                com_range: antenna.com_range,
                radar_range: antenna.radar_range,
                max_energy: battery.max_energy,
                selected: selected == Some(entity),
            })
        })
        .collect()
}

/// Build BaseStationView list.
fn build_base_stations(world: &World, base_stations: &[Entity]) -> Vec<BaseStationView> {
    base_stations
        .iter()
        .filter_map(|&entity| {
            let mut query = world
                .query_one::<(&Tag, &SpatialState, &AntennaProfile, &PacketBuffer)>(entity)
                .ok()?;
            let (tag, state, antenna, buffer) = query.get()?;
            Some(BaseStationView {
                id: tag.0,
                coords: state.coords,
                com_range: antenna.com_range,
                buffer_len: buffer.len(),
            })
        })
        .collect()
}
