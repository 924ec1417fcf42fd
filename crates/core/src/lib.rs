//! Wildfire Cellular Automaton Core Library
//!
//! A stochastic cellular automaton for wildfire spread over a 2D grid. Each
//! burning cell may ignite its eight neighbours with a probability built from
//! vegetation type, vegetation density, wind and terrain slope, and strong
//! aligned winds can carry embers several cells ahead of the front.
//!
//! ## Layout
//!
//! - [`core_types`] - positions, cells and model parameters
//! - [`grid`] - the owned row-major cell grid
//! - [`physics`] - ignition probability and ember spotting rules
//! - [`simulation`] - the stepping engine, statistics and parallel ensembles
//!
//! Randomness is injected: [`WildfireCA::with_seed`] gives reproducible runs.

// Core types and utilities
pub mod core_types;
pub mod error;

pub mod grid;
pub mod physics;
pub mod simulation;

// Re-export core types
pub use core_types::{Cell, CellState, Density, Position, VegetationType, WildfireParams};
pub use error::{Result, WildfireError};

pub use grid::CellGrid;
pub use physics::IgnitionModel;
pub use simulation::{run_ensemble, EnsembleSummary, FireStatistics, RunSummary, WildfireCA};
