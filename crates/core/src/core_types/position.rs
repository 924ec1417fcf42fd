//! Integer grid coordinates and direction vectors.
//!
//! A `Position` doubles as a cell address and as a direction vector
//! (`to - from`). Spotting trajectories are expressed as
//! `origin + k * direction`, so the type supports the usual vector
//! arithmetic including scalar multiplication from either side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// 2D integer coordinate on the simulation grid.
///
/// `x` grows to the east (columns), `y` grows to the south (rows), so the
/// direction `(0, -1)` points north. Validity against a particular grid is
/// checked by the grid, not by this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a position from its components
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Per-axis sign of `other - self`.
    ///
    /// Reduces any aligned displacement to one of the 8 unit compass
    /// directions, or `(0, 0)` when both positions coincide.
    #[must_use]
    pub fn direction_to(self, other: Position) -> Position {
        let delta = other - self;
        Position::new(delta.x.signum(), delta.y.signum())
    }

    /// True if `other` is one of the 8 cells surrounding `self`
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        let delta = other - self;
        self != other && delta.x.abs() <= 1 && delta.y.abs() <= 1
    }

    /// The 8 surrounding positions, without bounds filtering
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        NEIGHBOR_OFFSETS.into_iter().map(move |offset| self + offset)
    }
}

/// Moore neighbourhood offsets, row by row from the north-west corner
const NEIGHBOR_OFFSETS: [Position; 8] = [
    Position::new(-1, -1),
    Position::new(0, -1),
    Position::new(1, -1),
    Position::new(-1, 0),
    Position::new(1, 0),
    Position::new(-1, 1),
    Position::new(0, 1),
    Position::new(1, 1),
];

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Position) {
        *self = *self + rhs;
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Position {
    fn sub_assign(&mut self, rhs: Position) {
        *self = *self - rhs;
    }
}

impl Mul<i32> for Position {
    type Output = Position;

    fn mul(self, k: i32) -> Position {
        Position::new(self.x * k, self.y * k)
    }
}

impl Mul<Position> for i32 {
    type Output = Position;

    fn mul(self, pos: Position) -> Position {
        pos * self
    }
}

impl MulAssign<i32> for Position {
    fn mul_assign(&mut self, k: i32) {
        *self = *self * k;
    }
}
