//! Physics module - stochastic spread rule and ember spotting

pub mod ignition;
pub mod spotting;

pub use ignition::{compass_angle, IgnitionModel, P_DEN, P_VEG};
pub use spotting::{is_wind_aligned, spotting_line, wind_spread_distance, SPOTTING_ALIGNMENT};
