//! ECS components for hecs entities, plus the plain records the environment
//! keeps outside the ECS (obstacles, targets, events).
//!
//! Components are plain data. The few methods here only guard invariants of
//! the component itself; game logic lives in systems.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::types::Coords;

/// Identity component attached to every spatial entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(pub EntityId);

/// Position of a spatial entity, with the coordinates it held one tick ago.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialState {
    pub coords: Coords,
    /// Coordinates before the last move. Equal to `coords` until the first move.
    pub previous_coords: Coords,
}

/// Heading and speed of a mobile unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Heading in degrees, normalized into `[0, 360)`. 0 = East, counter-clockwise.
    pub angle_deg: f64,
    /// Scalar speed in m/s.
    pub speed: f64,
}

/// Ordered, non-empty waypoint sequence with a cyclic cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoints {
    path: Vec<Coords>,
    current: usize,
}

/// Communication, sensing and radar radii (meters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AntennaProfile {
    pub com_range: f64,
    pub sensing_range: f64,
    pub radar_range: f64,
}

/// Energy budget carried by a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub max_energy: f64,
}

/// The base station a unit reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeStation(pub EntityId);

/// Marks an entity as a mobile unit (drone).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Unit;

/// Marks an entity as a stationary base station.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaseStation;

/// A packet carried in a buffer. Its payload is opaque to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Packet {
    pub id: EntityId,
    /// Event this packet reports.
    pub event: EntityId,
    /// First tick at which the packet is no longer worth delivering.
    pub expires_at_tick: u64,
}

/// Bounded packet store of a unit or base station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PacketBuffer {
    pub capacity: usize,
    pub packets: Vec<Packet>,
}

/// Static line-segment obstacle `(x1, y1) - (x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Stationary point of interest whose freshness decays between visits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: EntityId,
    pub coords: Coords,
    /// Idleness (seconds) after which the residual reaches zero.
    pub max_tolerated_idleness_secs: f64,
    /// Tick of the last visit. Never later than the current tick.
    pub last_visit_tick: u64,
}

/// Something sensed in the area; lives for `ttl_ticks` after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub coords: Coords,
    pub created_tick: u64,
    pub ttl_ticks: u64,
}

impl Waypoints {
    /// Build a waypoint sequence. Returns `None` for an empty path.
    pub fn new(path: Vec<Coords>) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self { path, current: 0 })
    }

    /// The waypoint the unit is currently heading to.
    pub fn target(&self) -> Coords {
        self.path[self.current]
    }

    /// First waypoint; also the respawn point after a collision.
    pub fn first(&self) -> Coords {
        self.path[0]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn path(&self) -> &[Coords] {
        &self.path
    }

    /// Move the cursor to the next waypoint, wrapping to 0 after the last.
    pub fn advance(&mut self) {
        self.current = if self.current < self.path.len() - 1 {
            self.current + 1
        } else {
            0
        };
    }
}

impl SpatialState {
    pub fn at(coords: Coords) -> Self {
        Self {
            coords,
            previous_coords: coords,
        }
    }
}

impl PacketBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            packets: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.packets.len() >= self.capacity
    }

    pub fn is_known_packet(&self, packet: &Packet) -> bool {
        self.packets.contains(packet)
    }

    /// Store a packet unless the buffer is full or already holds it.
    pub fn accept(&mut self, packet: Packet) -> bool {
        if self.is_full() || self.is_known_packet(&packet) {
            return false;
        }
        self.packets.push(packet);
        true
    }

    /// Remove every packet expired at `tick`. Returns the number removed.
    pub fn drop_expired(&mut self, tick: u64) -> usize {
        let before = self.packets.len();
        self.packets.retain(|p| p.expires_at_tick > tick);
        before - self.packets.len()
    }

    /// Remove the given packets. Returns the number removed.
    pub fn drop_packets(&mut self, ids: &[EntityId]) -> usize {
        let before = self.packets.len();
        self.packets.retain(|p| !ids.contains(&p.id));
        before - self.packets.len()
    }
}

impl Obstacle {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn start(&self) -> Coords {
        Coords::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Coords {
        Coords::new(self.x2, self.y2)
    }
}

impl Target {
    pub fn new(id: EntityId, coords: Coords, max_tolerated_idleness_secs: f64) -> Self {
        Self {
            id,
            coords,
            max_tolerated_idleness_secs,
            last_visit_tick: 0,
        }
    }
}

impl Event {
    pub fn is_expired(&self, tick: u64) -> bool {
        tick >= self.created_tick + self.ttl_ticks
    }
}
