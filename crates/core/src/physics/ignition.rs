//! Ignition probability between a burning cell and a candidate neighbour.
//!
//! Implements the spread rule of Alexandridis et al. (2008):
//!
//! ```text
//! p_burn = p_h × (1 + p_veg) × (1 + p_den) × p_w × p_s
//! ```
//!
//! # Wind
//!
//! The propagation direction is mapped onto a compass angle (0 = north,
//! clockwise) and compared with the wind direction:
//!
//! ```text
//! θ   = |angle(to − from) − wind_angle|
//! p_w = exp(V × (c1 + c2 × (cos θ − 1)))
//! ```
//!
//! `θ` is the plain absolute difference and is not wrapped into `[0, π]`.
//! The wind factor only sees it through `cos`, so this matters for the
//! spotting alignment test, which compares `θ` directly.
//!
//! # Slope
//!
//! ```text
//! θ_s = atan((E_from − E_to) / l)
//! p_s = exp(a × θ_s)
//! ```
//!
//! where `l` is the cell side for orthogonal steps and `side × √2` for
//! diagonal ones.
//!
//! The product is not clamped: values above 1 always ignite and values at or
//! below 0 never ignite when compared against a uniform `[0, 1)` draw.

use crate::core_types::{Density, Position, VegetationType, WildfireParams};
use crate::error::{Result, WildfireError};
use crate::grid::CellGrid;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};

/// Vegetation coefficient `p_veg`, indexed by [`VegetationType`]
pub const P_VEG: [f32; 4] = [-1.0, -0.3, 0.0, 0.4];

/// Density coefficient `p_den`, indexed by [`Density`]
pub const P_DEN: [f32; 4] = [-1.0, -0.4, 0.0, 0.3];

/// Vegetation term `p_veg` for a vegetation class
#[inline]
pub fn vegetation_coefficient(vegetation: VegetationType) -> f32 {
    P_VEG[vegetation as usize]
}

/// Density term `p_den` for a density class
#[inline]
pub fn density_coefficient(density: Density) -> f32 {
    P_DEN[density as usize]
}

/// Compass angle (radians, clockwise from north) of a unit direction.
///
/// North is `(0, -1)`. Returns `None` for the zero vector or any
/// component outside `{-1, 0, 1}`.
pub fn compass_angle(direction: Position) -> Option<f32> {
    let angle = match (direction.x, direction.y) {
        (0, -1) => 0.0,
        (1, -1) => FRAC_PI_4,
        (1, 0) => FRAC_PI_2,
        (1, 1) => 3.0 * FRAC_PI_4,
        (0, 1) => PI,
        (-1, 1) => 5.0 * FRAC_PI_4,
        (-1, 0) => 3.0 * FRAC_PI_2,
        (-1, -1) => 7.0 * FRAC_PI_4,
        _ => return None,
    };
    Some(angle)
}

/// Read-only view of parameters and terrain used to evaluate spread
#[derive(Debug, Clone, Copy)]
pub struct IgnitionModel<'a> {
    params: &'a WildfireParams,
    grid: &'a CellGrid,
}

impl<'a> IgnitionModel<'a> {
    pub fn new(params: &'a WildfireParams, grid: &'a CellGrid) -> Self {
        Self { params, grid }
    }

    /// Unwrapped angle between the `from → to` direction and the wind.
    ///
    /// Any aligned pair is accepted; the displacement is reduced to its
    /// per-axis sign before lookup.
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::DegenerateDirection`] when `from == to`.
    pub fn propagation_wind_angle(&self, from: Position, to: Position) -> Result<f32> {
        let angle =
            compass_angle(from.direction_to(to)).ok_or(WildfireError::DegenerateDirection(from))?;
        Ok((angle - self.params.wind_angle).abs())
    }

    /// Horizontal distance between cell centres (m)
    pub fn slope_length(&self, from: Position, to: Position) -> f32 {
        if from.x == to.x || from.y == to.y {
            self.params.cell_side_length
        } else {
            self.params.cell_side_length * SQRT_2
        }
    }

    /// Terrain slope angle (rad), positive when `to` lies below `from`.
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::OutOfBounds`] if either position is off the grid.
    pub fn slope_angle(&self, from: Position, to: Position) -> Result<f32> {
        self.grid.cell(from)?;
        self.grid.cell(to)?;
        Ok(self.slope_angle_at(from, to))
    }

    /// `exp(V × (c1 + c2 × (cos θ − 1)))`
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::DegenerateDirection`] when `from == to`.
    pub fn wind_factor(&self, from: Position, to: Position) -> Result<f32> {
        let theta = self.propagation_wind_angle(from, to)?;
        let WildfireParams {
            c1, c2, wind_speed, ..
        } = *self.params;
        Ok((wind_speed * (c1 + c2 * (theta.cos() - 1.0))).exp())
    }

    /// `exp(a × θ_s)`
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::OutOfBounds`] if either position is off the grid.
    pub fn slope_factor(&self, from: Position, to: Position) -> Result<f32> {
        self.slope_angle(from, to)
            .map(|theta_s| (self.params.a * theta_s).exp())
    }

    /// Probability that a fire at `from` ignites `to` this tick (unclamped).
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::OutOfBounds`] if either position is off the
    /// grid, or [`WildfireError::DegenerateDirection`] when `from == to`.
    pub fn burn_probability(&self, from: Position, to: Position) -> Result<f32> {
        self.grid.cell(from)?;
        self.grid.cell(to)?;
        self.burn_probability_at(from, to)
    }

    /// [`IgnitionModel::burn_probability`] for positions already known to be
    /// on the grid.
    pub(crate) fn burn_probability_at(&self, from: Position, to: Position) -> Result<f32> {
        let target = self.grid.cell_at(to);
        let p_veg = vegetation_coefficient(target.vegetation);
        let p_den = density_coefficient(target.density);
        let p_w = self.wind_factor(from, to)?;
        let p_s = (self.params.a * self.slope_angle_at(from, to)).exp();

        Ok(self.params.p_h * (1.0 + p_veg) * (1.0 + p_den) * p_w * p_s)
    }

    fn slope_angle_at(&self, from: Position, to: Position) -> f32 {
        let rise = self.grid.cell_at(from).elevation - self.grid.cell_at(to).elevation;
        (rise / self.slope_length(from, to)).atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Cell, CellState};
    use approx::assert_relative_eq;

    fn calm_params() -> WildfireParams {
        WildfireParams::spetses_1990()
            .with_wind(0.0, 0.0)
            .with_spotting(false)
    }

    #[test]
    fn test_compass_angles_cover_all_directions() {
        let expected = [
            ((0, -1), 0.0),
            ((1, -1), FRAC_PI_4),
            ((1, 0), FRAC_PI_2),
            ((1, 1), 3.0 * FRAC_PI_4),
            ((0, 1), PI),
            ((-1, 1), 5.0 * FRAC_PI_4),
            ((-1, 0), 3.0 * FRAC_PI_2),
            ((-1, -1), 7.0 * FRAC_PI_4),
        ];
        for (dir, angle) in expected {
            assert_relative_eq!(compass_angle(Position::from(dir)).unwrap(), angle);
        }
        assert_eq!(compass_angle(Position::new(0, 0)), None);
        assert_eq!(compass_angle(Position::new(2, 0)), None);
    }

    #[test]
    fn test_degenerate_direction_is_an_error() {
        let params = calm_params();
        let grid = CellGrid::new(3, 3).unwrap();
        let model = IgnitionModel::new(&params, &grid);
        let p = Position::new(1, 1);
        assert_eq!(
            model.propagation_wind_angle(p, p),
            Err(WildfireError::DegenerateDirection(p))
        );
        assert!(model.burn_probability(p, p).is_err());
    }

    #[test]
    fn test_wind_angle_is_absolute_and_unwrapped() {
        let params = calm_params().with_wind(FRAC_PI_4, 0.0);
        let grid = CellGrid::new(3, 3).unwrap();
        let model = IgnitionModel::new(&params, &grid);
        let center = Position::new(1, 1);

        // North-west is 7π/4; the shortest distance to π/4 would be π/2
        let theta = model
            .propagation_wind_angle(center, Position::new(0, 0))
            .unwrap();
        assert_relative_eq!(theta, 3.0 * FRAC_PI_2, epsilon = 1e-6);

        // Below the wind angle the difference stays positive
        let theta = model
            .propagation_wind_angle(center, Position::new(1, 0))
            .unwrap();
        assert_relative_eq!(theta, FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn test_aligned_pairs_share_compass_angle() {
        let params = calm_params();
        let grid = CellGrid::new(10, 10).unwrap();
        let model = IgnitionModel::new(&params, &grid);
        let origin = Position::new(1, 1);
        let near = model
            .propagation_wind_angle(origin, Position::new(2, 2))
            .unwrap();
        let far = model
            .propagation_wind_angle(origin, Position::new(6, 6))
            .unwrap();
        assert_relative_eq!(near, far);
    }

    #[test]
    fn test_slope_length() {
        let params = calm_params();
        let grid = CellGrid::new(3, 3).unwrap();
        let model = IgnitionModel::new(&params, &grid);
        let center = Position::new(1, 1);

        for n in [(1, 0), (0, 1), (2, 1), (1, 2)] {
            assert_relative_eq!(model.slope_length(center, Position::from(n)), 100.0);
        }
        for n in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_relative_eq!(
                model.slope_length(center, Position::from(n)),
                141.421_36,
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn test_slope_angle_sign_and_factor() {
        let params = calm_params();
        let mut grid = CellGrid::new(3, 1).unwrap();
        let high = Cell {
            elevation: 100.0,
            ..Cell::default()
        };
        grid.set_cell(Position::new(1, 0), high).unwrap();
        let model = IgnitionModel::new(&params, &grid);

        let top = Position::new(1, 0);
        let bottom = Position::new(0, 0);

        // 100 m drop over one 100 m cell is 45°
        assert_relative_eq!(model.slope_angle(top, bottom).unwrap(), FRAC_PI_4);
        assert_relative_eq!(model.slope_angle(bottom, top).unwrap(), -FRAC_PI_4);

        assert_relative_eq!(
            model.slope_factor(top, bottom).unwrap(),
            (params.a * FRAC_PI_4).exp()
        );
        assert!(model.slope_factor(top, bottom).unwrap() > 1.0);
        assert!(model.slope_factor(bottom, top).unwrap() < 1.0);
    }

    #[test]
    fn test_wind_factor_peaks_along_the_wind() {
        // Wind blowing towards the east
        let params = calm_params().with_wind(FRAC_PI_2, 10.0);
        let grid = CellGrid::new(3, 3).unwrap();
        let model = IgnitionModel::new(&params, &grid);
        let center = Position::new(1, 1);

        let downwind = model.wind_factor(center, Position::new(2, 1)).unwrap();
        let crosswind = model.wind_factor(center, Position::new(1, 0)).unwrap();
        let upwind = model.wind_factor(center, Position::new(0, 1)).unwrap();

        assert_relative_eq!(downwind, (10.0 * params.c1).exp());
        assert!(downwind > crosswind);
        assert!(crosswind > upwind);
    }

    #[test]
    fn test_burn_probability_on_flat_calm_ground() {
        let params = calm_params();
        let grid = CellGrid::new(3, 3).unwrap();
        let model = IgnitionModel::new(&params, &grid);

        // Pine (+0.4), normal density (0), no wind, no slope
        let p = model
            .burn_probability(Position::new(1, 1), Position::new(2, 2))
            .unwrap();
        assert_relative_eq!(p, 0.58 * 1.4, epsilon = 1e-6);
    }

    #[test]
    fn test_burn_probability_can_exceed_one() {
        let mut params = calm_params().with_wind(FRAC_PI_2, 20.0);
        params.p_h = 0.9;
        let mut grid = CellGrid::new(3, 3).unwrap();
        let dense_pine = Cell::new(
            CellState::NotIgnited,
            Density::Dense,
            VegetationType::Pine,
            0.0,
        );
        grid.set_cell(Position::new(2, 1), dense_pine).unwrap();
        let model = IgnitionModel::new(&params, &grid);

        let p = model
            .burn_probability(Position::new(1, 1), Position::new(2, 1))
            .unwrap();
        assert!(p > 1.0, "unclamped probability {p} should exceed 1");
    }

    #[test]
    fn test_burn_probability_zero_without_fuel() {
        let params = calm_params();
        let mut grid = CellGrid::new(3, 3).unwrap();
        grid.set_cell(
            Position::new(0, 1),
            Cell::new(CellState::NotIgnited, Density::Empty, VegetationType::Pine, 0.0),
        )
        .unwrap();
        grid.set_cell(
            Position::new(2, 1),
            Cell::new(
                CellState::NotIgnited,
                Density::Dense,
                VegetationType::NoVegetation,
                0.0,
            ),
        )
        .unwrap();
        let model = IgnitionModel::new(&params, &grid);
        let center = Position::new(1, 1);

        assert_eq!(model.burn_probability(center, Position::new(0, 1)).unwrap(), 0.0);
        assert_eq!(model.burn_probability(center, Position::new(2, 1)).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_bounds_probability() {
        let params = calm_params();
        let grid = CellGrid::new(2, 2).unwrap();
        let model = IgnitionModel::new(&params, &grid);
        let err = model
            .burn_probability(Position::new(1, 1), Position::new(2, 2))
            .unwrap_err();
        assert!(matches!(err, WildfireError::OutOfBounds { .. }));
    }
}
