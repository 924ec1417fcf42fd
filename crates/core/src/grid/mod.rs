//! Grid module - the spatial domain of the automaton

pub mod cell_grid;

pub use cell_grid::CellGrid;
