//! Spatial indexing for the patrol simulation.
//!
//! Segment and point geometry, plus a uniform grid over the area that maps
//! continuous coordinates to cells and enumerates the cells a straight move
//! crosses.

pub use patrol_core as core;

pub mod geometry;
pub mod grid;

// Re-export key items for convenience.
pub use geometry::{
    angle_between_three_points, distance_point_segment, heading_deg, segments_cross,
    segments_intersect,
};
pub use grid::{all_centers, cells_in_travel, coord_to_cell, GridCell};
