//! Return guidance towards the depot.
//!
//! Units heading home first join a vertical channel at a fixed x, then fly
//! along it to the depot.

use patrol_core::constants::DEPOT_CHANNEL_TOLERANCE;
use patrol_core::types::Coords;

/// Vertical corridor at `x` shared by every unit returning to `depot`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepotChannel {
    pub x: f64,
    pub depot: Coords,
}

impl DepotChannel {
    pub const fn new(x: f64, depot: Coords) -> Self {
        Self { x, depot }
    }

    /// Channel directly above or below the depot.
    pub const fn through(depot: Coords) -> Self {
        Self::new(depot.x, depot)
    }

    /// Next waypoint for a unit at `pos`: the depot once the unit is inside
    /// the channel, otherwise the nearest point of the channel.
    pub fn next_target(&self, pos: Coords) -> Coords {
        if (pos.x - self.x).abs() < DEPOT_CHANNEL_TOLERANCE {
            self.depot
        } else {
            Coords::new(self.x, pos.y)
        }
    }
}
