//! Entity identity.
//!
//! Two entities are the same iff they share both kind and identifier, so an
//! `EntityId` can key maps and sets without looking at any other state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Concrete kind of a simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Unit,
    BaseStation,
    Target,
    Event,
    Packet,
}

/// Identity of a simulated entity. Never recycled within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub kind: EntityKind,
    pub id: u32,
}

impl EntityId {
    pub const fn new(kind: EntityKind, id: u32) -> Self {
        Self { kind, id }
    }

    pub const fn unit(id: u32) -> Self {
        Self::new(EntityKind::Unit, id)
    }

    pub const fn base_station(id: u32) -> Self {
        Self::new(EntityKind::BaseStation, id)
    }

    pub const fn target(id: u32) -> Self {
        Self::new(EntityKind::Target, id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            EntityKind::Unit => 'U',
            EntityKind::BaseStation => 'B',
            EntityKind::Target => 'T',
            EntityKind::Event => 'E',
            EntityKind::Packet => 'P',
        };
        write!(f, "{prefix}{}", self.id)
    }
}

/// Hands out identifiers per kind from monotonically increasing counters.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: [u32; 5],
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: EntityKind) -> EntityId {
        let slot = &mut self.next[kind as usize];
        let id = *slot;
        *slot += 1;
        EntityId::new(kind, id)
    }
}
