//! Stochastic cellular automaton driving fire spread over a [`CellGrid`]
//!
//! One call to [`WildfireCA::step`] advances the automaton by one tick:
//!
//! 1. Collect every burning cell (row-major snapshot taken before mutation)
//! 2. For each, try to ignite its flammable neighbours using the
//!    [`IgnitionModel`] probability against a uniform draw, with optional
//!    ember spotting along the wind
//! 3. Burn the collected cell down
//!
//! Cells ignited during a tick start spreading on the next tick. The engine
//! owns its grid and random source exclusively; run independent instances
//! (see [`run_ensemble`]) for parallel work.

pub mod ensemble;
pub mod stats;

pub use ensemble::{run_ensemble, EnsembleSummary, RunSummary};
pub use stats::FireStatistics;

use crate::core_types::{Cell, CellState, Position, WildfireParams};
use crate::error::{Result, WildfireError};
use crate::grid::CellGrid;
use crate::physics::{is_wind_aligned, spotting_line, wind_spread_distance, IgnitionModel};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Wildfire cellular automaton
///
/// # Example
///
/// ```
/// use wildfire_ca_core::{CellState, Position, WildfireCA, WildfireParams};
///
/// let params = WildfireParams::spetses_1990().with_spotting(false);
/// let mut ca = WildfireCA::with_seed(20, 20, params, 7).unwrap();
/// ca.add_fire_spot(Position::new(10, 10));
///
/// let burning = ca.step_and_collect().unwrap();
/// assert_eq!(burning, vec![Position::new(10, 10)]);
/// assert_eq!(ca.state(Position::new(10, 10)).unwrap(), CellState::BurnedDown);
/// ```
#[derive(Debug, Clone)]
pub struct WildfireCA<R = ChaCha8Rng> {
    grid: CellGrid,
    params: WildfireParams,
    rng: R,
    step_count: u64,
}

impl WildfireCA<ChaCha8Rng> {
    /// Create an automaton with an entropy-seeded random source.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WildfireError::InvalidConfiguration`] for
    /// non-positive dimensions or invalid parameters.
    pub fn new(width: i32, height: i32, params: WildfireParams) -> Result<Self> {
        Self::with_rng(width, height, params, ChaCha8Rng::from_os_rng())
    }

    /// Create an automaton whose random draws are reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`WildfireCA::new`].
    pub fn with_seed(width: i32, height: i32, params: WildfireParams, seed: u64) -> Result<Self> {
        Self::with_rng(width, height, params, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> WildfireCA<R> {
    /// Create an automaton drawing from an injected random source.
    ///
    /// Every cell starts as unburnt normal-density pine on flat ground; paint
    /// terrain with [`WildfireCA::set_cell`] before seeding fires.
    ///
    /// # Errors
    ///
    /// Same conditions as [`WildfireCA::new`].
    pub fn with_rng(width: i32, height: i32, params: WildfireParams, rng: R) -> Result<Self> {
        params.validate()?;
        let grid = CellGrid::new(width, height)?;

        info!(
            width,
            height,
            spotting = params.spotting_enabled,
            wind_speed = params.wind_speed,
            "Created wildfire automaton"
        );

        Ok(Self {
            grid,
            params,
            rng,
            step_count: 0,
        })
    }

    /// Grid width in cells
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    /// Grid height in cells
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Parameters fixed at construction
    pub fn params(&self) -> &WildfireParams {
        &self.params
    }

    /// Read-only access to the grid
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Number of completed steps
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Spread model evaluated against the current grid
    pub fn ignition_model(&self) -> IgnitionModel<'_> {
        IgnitionModel::new(&self.params, &self.grid)
    }

    pub fn valid_position(&self, pos: Position) -> bool {
        self.grid.valid_position(pos)
    }

    pub fn can_burn(&self, pos: Position) -> bool {
        self.grid.can_burn(pos)
    }

    /// Ignition state at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WildfireError::OutOfBounds`] if `pos` is off the grid.
    pub fn state(&self, pos: Position) -> Result<CellState> {
        self.grid.state(pos)
    }

    /// Full cell at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WildfireError::OutOfBounds`] if `pos` is off the grid.
    pub fn cell(&self, pos: Position) -> Result<&Cell> {
        self.grid.cell(pos)
    }

    /// Replace the cell at `pos` (terrain, fuel or state).
    ///
    /// Only allowed before the first step, so a running fire never sees a
    /// cell move back to an earlier state.
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::OutOfBounds`] if `pos` is off the grid, or
    /// [`WildfireError::InvalidConfiguration`] once the automaton has stepped.
    pub fn set_cell(&mut self, pos: Position, cell: Cell) -> Result<()> {
        if self.step_count > 0 {
            return Err(WildfireError::InvalidConfiguration(format!(
                "cannot replace cell at {pos} after {} steps",
                self.step_count
            )));
        }
        self.grid.set_cell(pos, cell)
    }

    /// Cells with their positions in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.grid.iter()
    }

    /// Start a fire at `pos`.
    ///
    /// Any on-grid cell that has not been ignited yet starts burning, fuel or
    /// not. Off-grid positions are ignored. Returns whether the cell was set
    /// burning.
    pub fn add_fire_spot(&mut self, pos: Position) -> bool {
        if !self.grid.valid_position(pos) {
            warn!(%pos, "Ignoring fire spot outside the grid");
            return false;
        }
        self.grid.set_burning_at(pos)
    }

    /// Positions burning right now, in row-major order
    pub fn collect_burning_cells(&self) -> Vec<Position> {
        self.grid.burning_positions()
    }

    /// True once nothing is burning; further steps change nothing
    pub fn is_exhausted(&self) -> bool {
        self.grid.iter().all(|(_, cell)| cell.state != CellState::Burning)
    }

    /// Advance one tick.
    ///
    /// # Errors
    ///
    /// Propagates ignition model errors; neighbour iteration never produces
    /// them for a well-formed grid.
    pub fn step(&mut self) -> Result<()> {
        self.step_and_collect().map(|_| ())
    }

    /// Advance one tick and return the cells that were burning when it began.
    ///
    /// # Errors
    ///
    /// Same conditions as [`WildfireCA::step`].
    pub fn step_and_collect(&mut self) -> Result<Vec<Position>> {
        let burning = self.grid.burning_positions();
        let mut ignited = 0_usize;
        let mut spotted = 0_usize;

        for &pos in &burning {
            if self.grid.cell_at(pos).state != CellState::Burning {
                continue;
            }

            for neighbor in pos.neighbors() {
                if !self.grid.can_burn(neighbor) {
                    continue;
                }

                let draw: f32 = self.rng.random();
                let probability = self.ignition_model().burn_probability_at(pos, neighbor)?;
                if probability > draw {
                    self.grid.ignite_at(neighbor);
                    ignited += 1;
                    spotted += self.spot_from(pos, neighbor)?;
                }
            }

            self.grid.burn_down_at(pos);
        }

        self.step_count = self.step_count.saturating_add(1);
        debug!(
            step = self.step_count,
            burning = burning.len(),
            ignited,
            spotted,
            "Advanced wildfire automaton"
        );

        Ok(burning)
    }

    /// Step until nothing burns or `max_steps` ticks have run.
    ///
    /// Returns the number of steps taken.
    ///
    /// # Errors
    ///
    /// Same conditions as [`WildfireCA::step`].
    pub fn run_until_exhausted(&mut self, max_steps: u32) -> Result<u32> {
        let mut steps = 0;
        while steps < max_steps && !self.is_exhausted() {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Cell counts per state and burned area
    pub fn statistics(&self) -> FireStatistics {
        FireStatistics::from_grid(&self.grid, self.params.cell_side_length)
    }

    /// Ember jump after `from` ignited `to`. Returns the number of spot fires.
    fn spot_from(&mut self, from: Position, to: Position) -> Result<usize> {
        if !self.params.spotting_enabled {
            return Ok(0);
        }
        let theta = self.ignition_model().propagation_wind_angle(from, to)?;
        if !is_wind_aligned(theta) {
            return Ok(0);
        }

        let spread = wind_spread_distance(self.params.wind_speed);
        let mut spotted = 0;
        for spot in spotting_line(from, to - from, spread) {
            if !self.grid.valid_position(spot) {
                break;
            }
            if self.grid.ignite_at(spot) {
                trace!(%from, %spot, "Spot fire");
                spotted += 1;
            }
        }
        Ok(spotted)
    }
}

impl<R> fmt::Display for WildfireCA<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grid, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Density, VegetationType};
    use std::f32::consts::FRAC_PI_2;

    fn calm(spotting: bool) -> WildfireParams {
        WildfireParams::spetses_1990()
            .with_wind(0.0, 0.0)
            .with_spotting(spotting)
    }

    #[test]
    fn test_constructor_rejects_bad_dimensions() {
        for (w, h) in [(0, 3), (3, 0), (-2, -2)] {
            let err = WildfireCA::with_seed(w, h, calm(false), 1).unwrap_err();
            assert!(matches!(err, WildfireError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_constructor_rejects_bad_params() {
        let mut params = calm(false);
        params.cell_side_length = 0.0;
        assert!(WildfireCA::with_seed(3, 3, params, 1).is_err());
    }

    #[test]
    fn test_add_fire_spot_is_lenient_off_grid() {
        let mut ca = WildfireCA::with_seed(3, 3, calm(false), 1).unwrap();
        assert!(!ca.add_fire_spot(Position::new(-1, 0)));
        assert!(!ca.add_fire_spot(Position::new(3, 3)));
        assert!(ca.collect_burning_cells().is_empty());

        assert!(ca.add_fire_spot(Position::new(0, 1)));
        assert_eq!(ca.state(Position::new(0, 1)), Ok(CellState::Burning));
    }

    #[test]
    fn test_add_fire_spot_ignores_fuel_but_not_state() {
        let mut ca = WildfireCA::with_seed(3, 3, calm(false), 1).unwrap();
        let bare = Cell::new(CellState::NotIgnited, Density::Empty, VegetationType::Pine, 0.0);
        ca.set_cell(Position::new(1, 1), bare).unwrap();
        ca.set_cell(Position::new(0, 0), Cell::no_fuel(0.0)).unwrap();

        assert!(ca.add_fire_spot(Position::new(1, 1)));
        assert_eq!(ca.state(Position::new(1, 1)), Ok(CellState::Burning));

        assert!(!ca.add_fire_spot(Position::new(0, 0)));
        assert_eq!(ca.state(Position::new(0, 0)), Ok(CellState::NoFuel));

        // Already burning
        assert!(!ca.add_fire_spot(Position::new(1, 1)));
    }

    #[test]
    fn test_add_fire_spot_does_not_relight_burned_cells() {
        let mut ca = WildfireCA::with_seed(3, 3, calm(false), 1).unwrap();
        for pos in Position::new(1, 1).neighbors() {
            ca.set_cell(pos, Cell::no_fuel(0.0)).unwrap();
        }
        ca.add_fire_spot(Position::new(1, 1));
        ca.step().unwrap();

        assert!(!ca.add_fire_spot(Position::new(1, 1)));
        assert_eq!(ca.state(Position::new(1, 1)), Ok(CellState::BurnedDown));
    }

    #[test]
    fn test_set_cell_rejected_after_first_step() {
        let mut ca = WildfireCA::with_seed(3, 3, calm(false), 1).unwrap();
        for pos in Position::new(1, 1).neighbors() {
            ca.set_cell(pos, Cell::no_fuel(0.0)).unwrap();
        }
        ca.add_fire_spot(Position::new(1, 1));
        ca.step().unwrap();
        assert_eq!(ca.state(Position::new(1, 1)), Ok(CellState::BurnedDown));

        let err = ca.set_cell(Position::new(1, 1), Cell::default()).unwrap_err();
        assert!(matches!(err, WildfireError::InvalidConfiguration(_)));
        assert_eq!(ca.state(Position::new(1, 1)), Ok(CellState::BurnedDown));
    }

    #[test]
    fn test_state_out_of_bounds() {
        let ca = WildfireCA::with_seed(3, 3, calm(false), 1).unwrap();
        assert!(matches!(
            ca.state(Position::new(1, 3)),
            Err(WildfireError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_collect_burning_cells() {
        let mut ca = WildfireCA::with_seed(3, 3, calm(false), 1).unwrap();
        for p in [(2, 2), (0, 0), (1, 1)] {
            ca.add_fire_spot(Position::from(p));
        }
        let mut burning = ca.collect_burning_cells();
        burning.sort_by_key(|p| (p.x, p.y));
        assert_eq!(
            burning,
            vec![Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]
        );
    }

    #[test]
    fn test_burning_cell_burns_down_after_one_step() {
        // Isolated by non-flammable neighbours, so nothing else can ignite
        let mut ca = WildfireCA::with_seed(3, 3, calm(false), 3).unwrap();
        for pos in Position::new(1, 1).neighbors() {
            ca.set_cell(pos, Cell::no_fuel(0.0)).unwrap();
        }
        ca.add_fire_spot(Position::new(1, 1));

        let burning = ca.step_and_collect().unwrap();
        assert_eq!(burning, vec![Position::new(1, 1)]);
        assert_eq!(ca.state(Position::new(1, 1)), Ok(CellState::BurnedDown));
        assert!(ca.is_exhausted());
        assert_eq!(ca.step_count(), 1);
    }

    #[test]
    fn test_certain_ignition_reaches_all_neighbors() {
        let mut params = calm(false);
        params.p_h = 1.0;
        let mut ca = WildfireCA::with_seed(3, 3, params, 11).unwrap();
        ca.add_fire_spot(Position::new(1, 1));
        ca.step().unwrap();

        // p = 1.0 × 1.4 on flat calm ground, above any draw in [0, 1)
        for pos in Position::new(1, 1).neighbors() {
            assert_eq!(ca.state(pos), Ok(CellState::Burning));
        }
        assert_eq!(ca.state(Position::new(1, 1)), Ok(CellState::BurnedDown));
    }

    #[test]
    fn test_zero_probability_never_ignites() {
        let mut params = calm(false);
        params.p_h = 0.0;
        let mut ca = WildfireCA::with_seed(3, 3, params, 5).unwrap();
        ca.add_fire_spot(Position::new(1, 1));
        ca.step().unwrap();

        assert!(ca.is_exhausted());
        let stats = ca.statistics();
        assert_eq!(stats.burned_down, 1);
        assert_eq!(stats.not_ignited, 8);
    }

    #[test]
    fn test_same_random_state_replays_identically() {
        let mut ca = WildfireCA::with_seed(3, 3, calm(false), 5).unwrap();
        let sparse_fields = Cell::new(
            CellState::NotIgnited,
            Density::Sparse,
            VegetationType::Agricultural,
            0.0,
        );
        for pos in Position::new(1, 1).neighbors() {
            ca.set_cell(pos, sparse_fields).unwrap();
        }
        ca.add_fire_spot(Position::new(1, 1));

        let mut replay = ca.clone();
        ca.step().unwrap();
        replay.step().unwrap();
        assert_eq!(ca.to_string(), replay.to_string());
    }

    #[test]
    fn test_spotting_follows_the_wind() {
        // Eastward gale, certain ignition
        let mut params = WildfireParams::spetses_1990().with_wind(FRAC_PI_2, 15.0);
        params.p_h = 1.0;
        let mut ca = WildfireCA::with_seed(20, 3, params, 2).unwrap();
        ca.add_fire_spot(Position::new(0, 1));
        ca.step().unwrap();

        for x in 1..=10 {
            assert_eq!(
                ca.state(Position::new(x, 1)),
                Ok(CellState::Burning),
                "cell ({x}, 1) should burn"
            );
        }
        assert_eq!(ca.state(Position::new(11, 1)), Ok(CellState::NotIgnited));
    }

    #[test]
    fn test_spotting_stops_at_boundary() {
        let mut params = WildfireParams::spetses_1990().with_wind(FRAC_PI_2, 15.0);
        params.p_h = 1.0;
        let mut ca = WildfireCA::with_seed(6, 1, params, 2).unwrap();
        ca.add_fire_spot(Position::new(0, 0));
        ca.step().unwrap();

        for x in 1..6 {
            assert_eq!(ca.state(Position::new(x, 0)), Ok(CellState::Burning));
        }
    }

    #[test]
    fn test_spotting_skips_unburnable_cells() {
        let mut params = WildfireParams::spetses_1990().with_wind(FRAC_PI_2, 15.0);
        params.p_h = 1.0;
        let mut ca = WildfireCA::with_seed(8, 1, params, 2).unwrap();
        ca.set_cell(Position::new(3, 0), Cell::no_fuel(0.0)).unwrap();
        ca.add_fire_spot(Position::new(0, 0));
        ca.step().unwrap();

        assert_eq!(ca.state(Position::new(3, 0)), Ok(CellState::NoFuel));
        assert_eq!(ca.state(Position::new(4, 0)), Ok(CellState::Burning));
        assert_eq!(ca.state(Position::new(7, 0)), Ok(CellState::Burning));
    }

    #[test]
    fn test_render_matches_grid() {
        let mut ca = WildfireCA::with_seed(3, 2, calm(false), 1).unwrap();
        ca.add_fire_spot(Position::new(2, 0));
        assert_eq!(ca.to_string(), "1 1 2\n1 1 1\n");
    }

    #[test]
    fn test_run_until_exhausted() {
        let mut ca = WildfireCA::with_seed(10, 10, calm(false), 9).unwrap();
        ca.add_fire_spot(Position::new(5, 5));
        let steps = ca.run_until_exhausted(1_000).unwrap();
        assert!(steps >= 1);
        assert!(ca.is_exhausted());
        assert_eq!(ca.statistics().burning, 0);
    }
}
