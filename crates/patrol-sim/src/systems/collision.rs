//! Collision system: unit against the static obstacle field.
//!
//! Runs before a unit moves and inspects the displacement of its previous
//! move. Obstacles farther from the unit than one tick of travel are skipped;
//! the rest are tested exactly against the displacement segment.

use hecs::{Entity, World};
use tracing::debug;

use patrol_core::components::{Motion, Obstacle, SpatialState, Tag, Waypoints};
use patrol_core::constants::COLLISION_NEAR_MISS;
use patrol_core::types::{Coords, SimContext};
use patrol_grid::{distance_point_segment, segments_cross};

/// Distance from `coords` to every obstacle, in obstacle order.
pub fn distance_obstacles(coords: Coords, obstacles: &[Obstacle]) -> Vec<f64> {
    obstacles
        .iter()
        .map(|ob| distance_point_segment(ob.start(), ob.end(), coords))
        .collect()
}

/// Index of the first obstacle hit by the move `previous_coords -> coords`.
///
/// An obstacle is a candidate when it lies within `reach` of the current
/// position. A candidate is hit when it crosses the displacement segment or
/// sits closer than one meter to the current position.
pub fn find_collision(state: &SpatialState, reach: f64, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|ob| {
        let distance = distance_point_segment(ob.start(), ob.end(), state.coords);
        distance <= reach
            && (segments_cross(ob.start(), ob.end(), state.previous_coords, state.coords)
                || distance < COLLISION_NEAR_MISS)
    })
}

/// Check one unit and send it back to its first waypoint on a hit.
/// Returns whether a collision was handled.
pub fn check(
    state: &mut SpatialState,
    motion: &Motion,
    waypoints: &Waypoints,
    ctx: &SimContext,
    obstacles: &[Obstacle],
) -> bool {
    if obstacles.is_empty() {
        return false;
    }

    match find_collision(state, ctx.step_distance(motion.speed), obstacles) {
        Some(_) => {
            state.coords = waypoints.first();
            true
        }
        None => false,
    }
}

/// Collision check for the unit behind `entity`.
pub fn run_unit(world: &mut World, entity: Entity, ctx: &SimContext, obstacles: &[Obstacle]) -> bool {
    let Ok((tag, state, motion, waypoints)) =
        world.query_one_mut::<(&Tag, &mut SpatialState, &Motion, &Waypoints)>(entity)
    else {
        return false;
    };

    let from = state.coords;
    let hit = check(state, motion, waypoints, ctx, obstacles);
    if hit {
        debug!(
            unit = %tag.0,
            x = from.x,
            y = from.y,
            "collision with obstacle, unit respawned at its first waypoint"
        );
    }
    hit
}
