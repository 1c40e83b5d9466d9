//! Systems that operate on the simulated area each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only
//! ones) plus the engine-owned records they need. They keep no state of
//! their own, except the event generator's random stream.

pub mod collision;
pub mod events;
pub mod freshness;
pub mod mobility;
pub mod snapshot;
