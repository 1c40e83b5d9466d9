//! Spawn factories for setting up the simulated area.
//!
//! Units and base stations become hecs entities with their component
//! bundles. Obstacles and targets are plain records owned by the engine.

use glam::DVec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use patrol_core::components::*;
use patrol_core::config::SimConfig;
use patrol_core::constants::{OBSTACLE_MAX_LENGTH, OBSTACLE_MIN_LENGTH, ORTHOGONAL_ANGLES};
use patrol_core::entity::{EntityId, EntityKind, IdAllocator};
use patrol_core::types::{Coords, WorldBounds};

/// Draw `count` random segment obstacles.
///
/// Each starts at an integer point of the area and extends 100 to 299 m at
/// an integer heading, or a multiple of 90 degrees when `orthogonal`. The
/// far end may lie outside the area.
pub fn spawn_obstacles(
    rng: &mut ChaCha8Rng,
    bounds: WorldBounds,
    count: usize,
    orthogonal: bool,
) -> Vec<Obstacle> {
    let max_x = (bounds.width as u32).max(1);
    let max_y = (bounds.height as u32).max(1);

    let obstacles: Vec<Obstacle> = (0..count)
        .map(|_| {
            let start = DVec2::new(
                rng.gen_range(0..max_x) as f64,
                rng.gen_range(0..max_y) as f64,
            );
            let length = rng.gen_range(OBSTACLE_MIN_LENGTH..OBSTACLE_MAX_LENGTH) as f64;
            let angle = if orthogonal {
                ORTHOGONAL_ANGLES[rng.gen_range(0..ORTHOGONAL_ANGLES.len())]
            } else {
                rng.gen_range(0..359)
            };

            let end = start + DVec2::from_angle((angle as f64).to_radians()) * length;
            Obstacle::new(start.x, start.y, end.x, end.y)
        })
        .collect();

    info!(count = obstacles.len(), orthogonal, "spawned obstacles");
    obstacles
}

/// Create one target per coordinate, never visited yet.
pub fn spawn_targets(
    ids: &mut IdAllocator,
    coords: &[Coords],
    max_tolerated_idleness_secs: f64,
) -> Vec<Target> {
    let targets: Vec<Target> = coords
        .iter()
        .map(|&c| Target::new(ids.allocate(EntityKind::Target), c, max_tolerated_idleness_secs))
        .collect();

    info!(count = targets.len(), "spawned targets");
    targets
}

/// Spawn the base station units report to.
pub fn spawn_base_station(world: &mut World, id: EntityId, config: &SimConfig) -> hecs::Entity {
    let antenna = AntennaProfile {
        com_range: config.base_station_com_range,
        ..Default::default()
    };

    world.spawn((
        BaseStation,
        Tag(id),
        SpatialState::at(config.base_station_coords),
        antenna,
        PacketBuffer::with_capacity(config.max_buffer),
    ))
}

/// Spawn a unit sitting on its first waypoint.
///
/// Path-following units cruise at the configured speed. Free-moving units
/// start at rest and wait for steering commands.
pub fn spawn_unit(
    world: &mut World,
    id: EntityId,
    waypoints: Waypoints,
    home: EntityId,
    config: &SimConfig,
) -> hecs::Entity {
    let speed = if config.is_free_movement() {
        0.0
    } else {
        config.unit_speed
    };
    let motion = Motion {
        angle_deg: config.unit_angle_deg.rem_euclid(360.0),
        speed,
    };
    let antenna = AntennaProfile {
        com_range: config.com_range,
        sensing_range: config.sensing_range,
        radar_range: config.radar_range,
    };

    world.spawn((
        Unit,
        Tag(id),
        SpatialState::at(waypoints.first()),
        motion,
        waypoints,
        antenna,
        Battery {
            max_energy: config.max_energy,
        },
        PacketBuffer::with_capacity(config.max_buffer),
        HomeStation(home),
    ))
}
