//! Wind-driven ember spotting
//!
//! When a fire front advances with the wind, embers can be carried well past
//! the adjacent cell. Here spotting is a deterministic jump: once a neighbour
//! ignites along a direction within [`SPOTTING_ALIGNMENT`] of the wind, every
//! cell `origin + k × direction` for `k = 2..=spread` is set burning, where
//! `spread` depends only on wind speed. The line ends at the grid boundary.

use crate::core_types::Position;
use std::f32::consts::PI;

/// Maximum wind/propagation angle difference (rad) that allows spotting
pub const SPOTTING_ALIGNMENT: f32 = PI / 10.0;

/// Spotting reach in cells, stepped by wind speed (m/s)
///
/// | wind speed | reach |
/// |------------|-------|
/// | > 14       | 10    |
/// | > 12       | 8     |
/// | > 10       | 6     |
/// | > 8        | 4     |
/// | otherwise  | 0     |
pub fn wind_spread_distance(wind_speed: f32) -> i32 {
    if wind_speed > 14.0 {
        10
    } else if wind_speed > 12.0 {
        8
    } else if wind_speed > 10.0 {
        6
    } else if wind_speed > 8.0 {
        4
    } else {
        0
    }
}

/// Whether a propagation at `wind_angle_difference` carries embers
#[inline]
pub fn is_wind_aligned(wind_angle_difference: f32) -> bool {
    wind_angle_difference < SPOTTING_ALIGNMENT
}

/// Candidate spot-fire cells `origin + k × direction` for `k = 2..=spread`.
///
/// Not bounds-filtered; callers stop at the first position off the grid.
pub fn spotting_line(
    origin: Position,
    direction: Position,
    spread: i32,
) -> impl Iterator<Item = Position> {
    (2..=spread).map(move |k| origin + k * direction)
}
