//! Mobility system.
//!
//! Moves a unit once per tick: path-following units first steer towards
//! their current waypoint, then every unit travels `speed * dt` along its
//! heading and is clamped into the area.

use glam::DVec2;
use hecs::{Entity, World};
use tracing::{debug, trace};

use patrol_core::components::{Motion, SpatialState, Tag, Waypoints};
use patrol_core::entity::EntityId;
use patrol_core::types::{Coords, SimContext};
use patrol_grid::heading_deg;

/// Whether a unit at `coords` reaches or passes `target` within this tick.
pub fn will_reach_target(coords: Coords, speed: f64, target: Coords, ctx: &SimContext) -> bool {
    ctx.step_distance(speed) >= coords.distance_to(&target)
}

/// Advance one unit by one tick.
///
/// With `path_following` set, the waypoint cursor moves on when the current
/// waypoint is within reach, and the heading is recomputed towards the
/// (possibly new) waypoint. Otherwise the externally set heading and speed
/// are used as they are.
pub fn step(
    id: EntityId,
    state: &mut SpatialState,
    motion: &mut Motion,
    waypoints: &mut Waypoints,
    ctx: &SimContext,
    path_following: bool,
) {
    if path_following {
        if will_reach_target(state.coords, motion.speed, waypoints.target(), ctx) {
            waypoints.advance();
            debug!(unit = %id, waypoint = waypoints.current_index(), "waypoint advanced");
        }
        motion.angle_deg = heading_deg(state.coords, waypoints.target());
    }

    let distance = ctx.step_distance(motion.speed);
    let heading = motion.angle_deg.to_radians();
    let moved = state.coords.as_dvec2() + DVec2::new(heading.cos(), heading.sin()) * distance;

    state.previous_coords = state.coords;
    state.coords = ctx.bounds.clamp(Coords::from(moved));

    if state.coords != Coords::from(moved) {
        trace!(unit = %id, x = moved.x, y = moved.y, "clamped to area");
    }
    trace!(unit = %id, x = state.coords.x, y = state.coords.y, "moved");
}

/// Move the unit behind `entity`. Entities without a full unit bundle are ignored.
pub fn run_unit(world: &mut World, entity: Entity, ctx: &SimContext, path_following: bool) {
    if let Ok((tag, state, motion, waypoints)) =
        world.query_one_mut::<(&Tag, &mut SpatialState, &mut Motion, &mut Waypoints)>(entity)
    {
        step(tag.0, state, motion, waypoints, ctx, path_following);
    }
}
