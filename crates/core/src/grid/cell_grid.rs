//! Fixed-size 2D cell grid
//!
//! Cells are stored in a single contiguous buffer in row-major order
//! (`y * width + x`). Public accessors are bounds-checked and return
//! [`WildfireError::OutOfBounds`]; the crate-internal `*_at` accessors assume
//! the caller has already validated the position.

use crate::core_types::{Cell, CellState, Position};
use crate::error::{Result, WildfireError};
use std::fmt;

/// The spatial domain of one simulation run
#[derive(Debug, Clone)]
pub struct CellGrid {
    width: i32,
    height: i32,
    /// Cells in row-major order: [y * width + x]
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Create a grid filled with default cells (unburnt normal pine, flat).
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::InvalidConfiguration`] if either dimension is
    /// not strictly positive or the cell count does not fit in memory indices.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Self::filled(width, height, Cell::default())
    }

    /// Create a grid with every cell set to `cell`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CellGrid::new`].
    pub fn filled(width: i32, height: i32, cell: Cell) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(WildfireError::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        let total_cells = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                WildfireError::InvalidConfiguration(format!(
                    "grid of {width}x{height} cells is too large"
                ))
            })?;

        Ok(Self {
            width,
            height,
            cells: vec![cell; total_cells],
        })
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// True iff `0 <= x < width` and `0 <= y < height`
    #[inline]
    pub fn valid_position(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// True iff the position is on the grid and its cell can ignite
    pub fn can_burn(&self, pos: Position) -> bool {
        self.valid_position(pos) && self.cell_at(pos).can_burn()
    }

    /// Bounds-checked cell access.
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::OutOfBounds`] if `pos` is not on the grid.
    pub fn cell(&self, pos: Position) -> Result<&Cell> {
        self.check(pos)?;
        Ok(self.cell_at(pos))
    }

    /// Ignition state at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::OutOfBounds`] if `pos` is not on the grid.
    pub fn state(&self, pos: Position) -> Result<CellState> {
        self.cell(pos).map(|cell| cell.state)
    }

    /// Replace the cell at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`WildfireError::OutOfBounds`] if `pos` is not on the grid.
    pub fn set_cell(&mut self, pos: Position, cell: Cell) -> Result<()> {
        self.check(pos)?;
        *self.cell_at_mut(pos) = cell;
        Ok(())
    }

    /// Iterate cells with their positions in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::new((i % width) as i32, (i / width) as i32), cell))
    }

    /// Positions currently burning, in row-major scan order
    pub fn burning_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, cell)| cell.state == CellState::Burning)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of cells in each state, indexed by [`CellState::code`]
    pub fn state_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for cell in &self.cells {
            counts[usize::from(cell.state.code())] += 1;
        }
        counts
    }

    /// Set `pos` burning if its cell can ignite. Returns whether it did.
    ///
    /// Position must be valid.
    pub(crate) fn ignite_at(&mut self, pos: Position) -> bool {
        let cell = self.cell_at_mut(pos);
        if cell.can_burn() {
            cell.state = CellState::Burning;
            true
        } else {
            false
        }
    }

    /// Set `pos` burning if it has not been ignited yet, regardless of fuel.
    /// Returns whether it did.
    ///
    /// Position must be valid.
    pub(crate) fn set_burning_at(&mut self, pos: Position) -> bool {
        let cell = self.cell_at_mut(pos);
        if cell.state == CellState::NotIgnited {
            cell.state = CellState::Burning;
            true
        } else {
            false
        }
    }

    /// Position must be valid.
    pub(crate) fn burn_down_at(&mut self, pos: Position) {
        self.cell_at_mut(pos).burn_down();
    }

    /// Position must be valid.
    #[inline]
    pub(crate) fn cell_at(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    #[inline]
    fn cell_at_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        debug_assert!(self.valid_position(pos), "unchecked access at {pos}");
        pos.y as usize * self.width as usize + pos.x as usize
    }

    fn check(&self, pos: Position) -> Result<()> {
        if self.valid_position(pos) {
            Ok(())
        } else {
            Err(WildfireError::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// One row per line, space-separated state codes
impl fmt::Display for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            let mut codes = row.iter().map(|cell| cell.state.code());
            if let Some(first) = codes.next() {
                write!(f, "{first}")?;
            }
            for code in codes {
                write!(f, " {code}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
