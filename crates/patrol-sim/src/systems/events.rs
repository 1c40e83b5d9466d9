//! Event generation and packet expiry.
//!
//! At a fixed interval a unit drawn at random senses an event at its own
//! position and stores a packet reporting it. Expired packets are dropped
//! from every buffer each tick.

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use patrol_core::components::{Event, Packet, PacketBuffer, SpatialState, Tag};
use patrol_core::entity::{EntityKind, IdAllocator};

/// Random stream used for event placement, kept apart from the one that
/// lays out obstacles.
const EVENT_STREAM: u64 = 1;

/// Periodic event source.
#[derive(Debug, Clone)]
pub struct EventGenerator {
    rng: ChaCha8Rng,
    interval_ticks: u64,
    ttl_ticks: u64,
}

impl EventGenerator {
    /// An `interval_ticks` of 0 never generates anything.
    pub fn new(seed: u64, interval_ticks: u64, ttl_ticks: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(EVENT_STREAM);
        Self {
            rng,
            interval_ticks,
            ttl_ticks,
        }
    }

    /// Whether an event is generated at `tick`. Never at tick 0.
    pub fn is_due(&self, tick: u64) -> bool {
        self.interval_ticks > 0 && tick > 0 && tick % self.interval_ticks == 0
    }

    /// Generate this tick's event, if due, on a unit drawn from `units`.
    /// The new event is appended to `events` and returned.
    pub fn run(
        &mut self,
        world: &mut World,
        units: &[Entity],
        ids: &mut IdAllocator,
        events: &mut Vec<Event>,
        tick: u64,
    ) -> Option<Event> {
        if !self.is_due(tick) || units.is_empty() {
            return None;
        }

        let entity = units[self.rng.gen_range(0..units.len())];
        let (tag, state, buffer) = world
            .query_one_mut::<(&Tag, &SpatialState, &mut PacketBuffer)>(entity)
            .ok()?;

        let event = Event {
            id: ids.allocate(EntityKind::Event),
            coords: state.coords,
            created_tick: tick,
            ttl_ticks: self.ttl_ticks,
        };
        let packet = Packet {
            id: ids.allocate(EntityKind::Packet),
            event: event.id,
            expires_at_tick: tick + self.ttl_ticks,
        };

        let stored = buffer.accept(packet);
        debug!(unit = %tag.0, event = %event.id, stored, "event generated");

        events.push(event);
        Some(event)
    }
}

/// Drop expired packets from every buffer. Returns the number dropped.
pub fn drop_expired_packets(world: &mut World, tick: u64) -> usize {
    let mut total = 0;
    for (_entity, (tag, buffer)) in world.query_mut::<(&Tag, &mut PacketBuffer)>() {
        let dropped = buffer.drop_expired(tick);
        if dropped > 0 {
            debug!(owner = %tag.0, dropped, "expired packets dropped");
        }
        total += dropped;
    }
    total
}
