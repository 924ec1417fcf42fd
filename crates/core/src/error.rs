//! Error type shared by the grid, ignition model and engine.

use crate::core_types::Position;

/// Errors surfaced to callers of the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum WildfireError {
    /// Position outside the grid extent
    OutOfBounds {
        position: Position,
        width: i32,
        height: i32,
    },
    /// Grid dimensions or parameters that cannot be simulated
    InvalidConfiguration(String),
    /// Wind angle requested for a zero-length direction (`from == to`)
    DegenerateDirection(Position),
}

impl std::fmt::Display for WildfireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WildfireError::OutOfBounds {
                position,
                width,
                height,
            } => write!(f, "Position {position} is outside the {width}x{height} grid"),
            WildfireError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {msg}"),
            WildfireError::DegenerateDirection(position) => write!(
                f,
                "No propagation direction from {position} to itself"
            ),
        }
    }
}

impl std::error::Error for WildfireError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, WildfireError>;
