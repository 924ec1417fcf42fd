//! Grid-wide fire statistics

use crate::core_types::CellState;
use crate::grid::CellGrid;
use serde::{Deserialize, Serialize};

/// Square metres per hectare
const SQ_METERS_PER_HECTARE: f32 = 10_000.0;

/// Snapshot of how many cells are in each state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FireStatistics {
    pub no_fuel: usize,
    pub not_ignited: usize,
    pub burning: usize,
    pub burned_down: usize,
    /// Area reached by the fire (burning + burned down), in hectares
    pub burned_area_ha: f32,
}

impl FireStatistics {
    pub(crate) fn from_grid(grid: &CellGrid, cell_side_length: f32) -> Self {
        let counts = grid.state_counts();
        let count = |state: CellState| counts[usize::from(state.code())];

        let burning = count(CellState::Burning);
        let burned_down = count(CellState::BurnedDown);
        let cell_area_sq_m = cell_side_length * cell_side_length;

        Self {
            no_fuel: count(CellState::NoFuel),
            not_ignited: count(CellState::NotIgnited),
            burning,
            burned_down,
            burned_area_ha: (burning + burned_down) as f32 * cell_area_sq_m / SQ_METERS_PER_HECTARE,
        }
    }

    /// Cells the fire has reached so far
    pub fn affected_cells(&self) -> usize {
        self.burning + self.burned_down
    }
}
