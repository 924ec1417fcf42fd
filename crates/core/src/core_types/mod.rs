//! Core types and utilities

pub mod cell;
pub mod params;
pub mod position;

pub use cell::{Cell, CellState, Density, VegetationType};
pub use params::WildfireParams;
pub use position::Position;
