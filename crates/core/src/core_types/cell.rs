//! Per-location cell state and static fuel attributes.

use serde::{Deserialize, Serialize};

/// Ignition state of a single cell.
///
/// Over a cell's lifetime the state only moves forward:
/// `NotIgnited → Burning → BurnedDown`. `NoFuel` is inert and is never
/// entered from `Burning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Nothing to burn (rock, water, firebreak)
    NoFuel = 0,
    /// Fuel present and not yet reached by the fire
    NotIgnited = 1,
    /// Actively burning this tick
    Burning = 2,
    /// Consumed
    BurnedDown = 3,
}

impl CellState {
    /// Numeric code used when rendering the grid
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Vegetation density class, ordered from bare to dense.
///
/// `Empty` makes a cell non-flammable regardless of its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Density {
    Empty = 0,
    Sparse = 1,
    Normal = 2,
    Dense = 3,
}

/// Vegetation type class, ordered by increasing flammability.
///
/// `NoVegetation` makes a cell non-flammable regardless of its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VegetationType {
    NoVegetation = 0,
    Agricultural = 1,
    Thickets = 2,
    Pine = 3,
}

/// One grid location: ignition state plus static fuel and terrain data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub state: CellState,
    pub density: Density,
    pub vegetation: VegetationType,
    /// Terrain height (m), used only for slope
    pub elevation: f32,
}

impl Cell {
    /// Create a cell with explicit attributes
    #[must_use]
    pub const fn new(
        state: CellState,
        density: Density,
        vegetation: VegetationType,
        elevation: f32,
    ) -> Self {
        Self {
            state,
            density,
            vegetation,
            elevation,
        }
    }

    /// Inert cell that can never ignite (firebreak, water body, bare rock)
    #[must_use]
    pub const fn no_fuel(elevation: f32) -> Self {
        Self::new(
            CellState::NoFuel,
            Density::Empty,
            VegetationType::NoVegetation,
            elevation,
        )
    }

    /// Whether the fire can reach this cell: unburnt, with fuel present
    #[must_use]
    pub fn can_burn(&self) -> bool {
        self.state == CellState::NotIgnited
            && self.density != Density::Empty
            && self.vegetation != VegetationType::NoVegetation
    }

    /// `Burning → BurnedDown`; any other state is left untouched
    pub(crate) fn burn_down(&mut self) {
        if self.state == CellState::Burning {
            self.state = CellState::BurnedDown;
        }
    }
}

impl Default for Cell {
    /// Unburnt pine of normal density on flat ground
    fn default() -> Self {
        Self::new(
            CellState::NotIgnited,
            Density::Normal,
            VegetationType::Pine,
            0.0,
        )
    }
}
