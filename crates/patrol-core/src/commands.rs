//! Steering commands sent by an external driver or routing strategy.
//!
//! Commands are queued and applied at the next tick boundary, before any
//! unit moves.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SELECT_TOLERANCE;

/// All possible external actions on units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UnitCommand {
    // --- Selection ---
    /// Select a unit by identifier.
    SelectUnit { unit: u32 },
    /// Select the unit closest to a world point, if within `tolerance` meters.
    SelectNearest { x: f64, y: f64, tolerance: f64 },

    // --- Free movement steering (applies to the selected unit) ---
    /// Decrease heading by the configured increment.
    TurnClockwise,
    /// Increase heading by the configured increment.
    TurnCounterClockwise,
    /// Increase speed by the configured increment.
    SpeedUp,
    /// Decrease speed by the configured increment (never below zero).
    SlowDown,

    // --- Direct control ---
    /// Overwrite a unit's heading and speed.
    SetHeading { unit: u32, angle_deg: f64, speed: f64 },
}

impl UnitCommand {
    /// Select the unit under a pointer at `(x, y)`, with the default tolerance.
    pub fn select_at(x: f64, y: f64) -> Self {
        Self::SelectNearest {
            x,
            y,
            tolerance: DEFAULT_SELECT_TOLERANCE,
        }
    }
}
